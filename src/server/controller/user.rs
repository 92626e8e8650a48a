use axum::{
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, ListDto, MessageDto},
        user::{ChangePasswordDto, CreateUserDto, UpdateUserFormDto, UserDto},
    },
    server::{
        controller::{
            form::FormFields,
            response::{message, ok},
        },
        error::Error,
        model::{app::AppState, auth::AuthUser, form::UpdateUserForm, query::ListQuery},
        service::{export::ExportFormat, session::SessionService, user::UserService},
    },
};

pub static USER_TAG: &str = "user";

/// Creates an account for a new employee, who registers later with the number id
///
/// # Responses
/// - 200: created
/// - 400: the caller is not an admin, the number id is taken or the role does not exist
#[utoipa::path(
    post,
    path = "/api/user",
    tag = USER_TAG,
    security(("bearer" = [])),
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted, number id taken or role not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserDto>,
) -> Result<impl IntoResponse, Error> {
    if payload.number_id.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(Error::Validation(
            "number_id and name are required".to_string(),
        ));
    }

    UserService::new(&state.db).create(&auth, payload).await?;

    Ok(message("success create!"))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Matching users", body = ApiResponse<ListDto<UserDto>>),
        (status = 400, description = "Invalid date range", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let users = UserService::new(&state.db).list(&query).await?;

    Ok(ok(users))
}

/// The user the token belongs to
#[utoipa::path(
    get,
    path = "/api/user/info",
    tag = USER_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller", body = ApiResponse<UserDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn user_info(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, Error> {
    let user = UserService::new(&state.db).info(&auth).await?;

    Ok(ok(user))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = ApiResponse<UserDto>),
        (status = 400, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = UserService::new(&state.db).get(id).await?;

    Ok(ok(user))
}

/// Updates a user; non admins may only update themselves
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "User id")),
    request_body(content = UpdateUserFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User updated", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted, invalid form or conflicting values", body = ErrorDto),
        (status = 502, description = "Profile picture could not be stored", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let form = UpdateUserForm::try_from(FormFields::read(multipart).await?)?;

    UserService::new(&state.db)
        .update(&auth, id, form, &state.storage)
        .await?;

    Ok(message("success update!"))
}

/// Removes a user and ends all of their sessions
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or user not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let sessions = SessionService::new(&state.redis, &state.keys);
    UserService::new(&state.db)
        .delete(&auth, id, &sessions)
        .await?;

    Ok(message("success delete!"))
}

#[utoipa::path(
    patch,
    path = "/api/user/change-password/{id}",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "User id, must be the caller")),
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or wrong password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, Error> {
    let sessions = SessionService::new(&state.redis, &state.keys);
    UserService::new(&state.db)
        .change_password(&auth, id, payload, &sessions)
        .await?;

    Ok(message("success change password!"))
}

/// Emails a generated password to the user
#[utoipa::path(
    patch,
    path = "/api/user/reset-password/{id}",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or user not registered", body = ErrorDto),
        (status = 502, description = "Email could not be delivered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let sessions = SessionService::new(&state.redis, &state.keys);
    UserService::new(&state.db)
        .reset_password(&auth, id, &state.mailer, &sessions)
        .await?;

    Ok(message("success reset password!"))
}

#[utoipa::path(
    get,
    path = "/api/user/export",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Spreadsheet, or application/pdf for format=pdf, of the users", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Unsupported format or caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let format = ExportFormat::parse(query.format.as_deref())?;

    Ok(UserService::new(&state.db).export(&auth, &query, format).await?)
}
