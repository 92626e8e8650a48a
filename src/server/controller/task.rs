use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, ListDto, MessageDto},
        task::{CreateTaskTypeDto, TaskDto, TaskTypeDto, UpdateTaskTypeDto},
    },
    server::{
        controller::response::{message, ok},
        error::Error,
        model::{app::AppState, auth::AuthUser, query::ListQuery},
        service::task::{TaskService, TaskTypeService},
    },
};

pub static TASK_TAG: &str = "task";

/// Lists the kinds of cleaning duty
#[utoipa::path(
    get,
    path = "/api/task",
    tag = TASK_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Matching tasks", body = ApiResponse<ListDto<TaskDto>>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let tasks = TaskService::new(&state.db).list(&query).await?;

    Ok(ok(tasks))
}

#[utoipa::path(
    get,
    path = "/api/task/type",
    tag = TASK_TAG,
    security(("bearer" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Matching task types", body = ApiResponse<ListDto<TaskTypeDto>>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_task_types(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let task_types = TaskTypeService::new(&state.db).list(&query).await?;

    Ok(ok(task_types))
}

/// Adds a task type under an existing task
///
/// # Responses
/// - 200: created
/// - 400: the caller is not an admin or the task does not exist
#[utoipa::path(
    post,
    path = "/api/task/type",
    tag = TASK_TAG,
    security(("bearer" = [])),
    request_body = CreateTaskTypeDto,
    responses(
        (status = 200, description = "Task type created", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or task not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_task_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTaskTypeDto>,
) -> Result<impl IntoResponse, Error> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation("name is required".to_string()));
    }

    TaskTypeService::new(&state.db)
        .create(&auth, name, payload.task_id)
        .await?;

    Ok(message("success create!"))
}

#[utoipa::path(
    put,
    path = "/api/task/type/{id}",
    tag = TASK_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Task type id")),
    request_body = UpdateTaskTypeDto,
    responses(
        (status = 200, description = "Task type updated", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted, task type or task not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_task_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskTypeDto>,
) -> Result<impl IntoResponse, Error> {
    let name = payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    TaskTypeService::new(&state.db)
        .update(&auth, id, name, payload.task_id)
        .await?;

    Ok(message("success update!"))
}

#[utoipa::path(
    delete,
    path = "/api/task/type/{id}",
    tag = TASK_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Task type id")),
    responses(
        (status = 200, description = "Task type deleted", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or task type not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_task_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    TaskTypeService::new(&state.db).delete(&auth, id).await?;

    Ok(message("success delete!"))
}
