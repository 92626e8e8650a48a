use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, ListDto},
        role::RoleDto,
    },
    server::{
        controller::response::ok,
        error::Error,
        model::{app::AppState, auth::AuthUser, query::ListQuery},
        service::{export::ensure_excel, role::RoleService},
    },
};

pub static ROLE_TAG: &str = "role";

/// Lists the roles users can be given
#[utoipa::path(
    get,
    path = "/api/role",
    tag = ROLE_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Matching roles", body = ApiResponse<ListDto<RoleDto>>),
        (status = 400, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let roles = RoleService::new(&state.db).list(&auth, &query).await?;

    Ok(ok(roles))
}

/// Downloads the roles as a spreadsheet
#[utoipa::path(
    get,
    path = "/api/role/export",
    tag = ROLE_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Spreadsheet of the roles", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Unsupported format or caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    ensure_excel(query.format.as_deref())?;

    Ok(RoleService::new(&state.db).export(&auth, &query).await?)
}
