use axum::{
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
};

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, ListDto, MessageDto},
        work::{
            CreateWorkFormDto, DashboardAdminDto, TaskTypeSummaryDto, UpdateWorkFormDto,
            WorkDetailDto, WorkDto,
        },
    },
    server::{
        controller::{
            form::FormFields,
            response::{message, ok},
        },
        error::Error,
        model::{
            app::AppState,
            auth::AuthUser,
            form::{CreateWorkForm, UpdateWorkForm},
            query::ListQuery,
        },
        service::{export::ExportFormat, notification::NotificationService, work::WorkService},
    },
};

pub static WORK_TAG: &str = "work";

/// Logs a cleaning job with optional before and after photos; staff only
#[utoipa::path(
    post,
    path = "/api/work",
    tag = WORK_TAG,
    security(("bearer" = [])),
    request_body(content = CreateWorkFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Work created", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted, invalid form, task or task type not found", body = ErrorDto),
        (status = 502, description = "Images could not be stored", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_work(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let form = CreateWorkForm::try_from(FormFields::read(multipart).await?)?;

    WorkService::new(&state.db)
        .create(&auth, form, &state.storage)
        .await?;

    Ok(message("success create!"))
}

/// Updates a work entry of the caller
///
/// # Responses
/// - 200: updated
/// - 400: the work does not exist or belongs to someone else, or a referenced task is missing
/// - 502: an image could not be stored
#[utoipa::path(
    put,
    path = "/api/work/{id}",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Work id")),
    request_body(content = UpdateWorkFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Work updated", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted, invalid form or references not found", body = ErrorDto),
        (status = 502, description = "Images could not be stored", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_work(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let form = UpdateWorkForm::try_from(FormFields::read(multipart).await?)?;

    WorkService::new(&state.db)
        .update(&auth, id, form, &state.storage)
        .await?;

    Ok(message("success update!"))
}

#[utoipa::path(
    delete,
    path = "/api/work/{id}",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Work id")),
    responses(
        (status = 200, description = "Work deleted", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or work not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_work(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let notifications = NotificationService::new(&state.redis, &state.keys);
    WorkService::new(&state.db)
        .delete(&auth, id, &notifications)
        .await?;

    Ok(message("success delete!"))
}

/// Lists work entries; staff only see their own
#[utoipa::path(
    get,
    path = "/api/work",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Matching work entries", body = ApiResponse<ListDto<WorkDto>>),
        (status = 400, description = "Invalid date range", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_works(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let unread = NotificationService::new(&state.redis, &state.keys)
        .unread_comment_ids(auth.id)
        .await?;
    let works = WorkService::new(&state.db)
        .list(&auth, &query, &unread)
        .await?;

    Ok(ok(works))
}

#[utoipa::path(
    get,
    path = "/api/work/{id}",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Work id")),
    responses(
        (status = 200, description = "The work entry with its images", body = ApiResponse<WorkDetailDto>),
        (status = 400, description = "Work not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_work(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let unread = NotificationService::new(&state.redis, &state.keys)
        .unread_comment_ids(auth.id)
        .await?;
    let work = WorkService::new(&state.db).detail(id, &unread).await?;

    Ok(ok(work))
}

#[utoipa::path(
    get,
    path = "/api/work/export",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Spreadsheet, or application/pdf for format=pdf, of the work entries", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Unsupported format or invalid date range", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_works(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let format = ExportFormat::parse(query.format.as_deref())?;

    Ok(WorkService::new(&state.db).export(&auth, &query, format).await?)
}

/// Work counts for a task, per floor for daily work and per staff member otherwise
#[utoipa::path(
    get,
    path = "/api/work/dashboard-admin",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Work counts", body = ApiResponse<DashboardAdminDto>),
        (status = 400, description = "Not permitted or task_id missing", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn dashboard_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let dashboard = WorkService::new(&state.db)
        .dashboard_admin(&auth, &query)
        .await?;

    Ok(ok(dashboard))
}

/// Work counts of a task per task type, across all staff.
///
/// Also answered at `/api/work/dashboard-staff`.
#[utoipa::path(
    get,
    path = "/api/work/dashboard-staf",
    tag = WORK_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Work counts", body = ApiResponse<Vec<TaskTypeSummaryDto>>),
        (status = 400, description = "task_id missing or invalid date range", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn dashboard_staff(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let dashboard = WorkService::new(&state.db).dashboard_staff(&query).await?;

    Ok(ok(dashboard))
}
