use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, ListDto, MessageDto},
        comment::{CommentDto, CreateCommentDto, UpdateCommentDto},
    },
    server::{
        controller::response::{message, ok},
        error::Error,
        model::{app::AppState, auth::AuthUser},
        service::{comment::CommentService, notification::NotificationService},
    },
};

pub static COMMENT_TAG: &str = "comment";

/// Comments of a work entry; reading them clears the caller's unread badge for them
#[utoipa::path(
    get,
    path = "/api/work/comment/{id}",
    tag = COMMENT_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Work id")),
    responses(
        (status = 200, description = "Comments, oldest first", body = ApiResponse<ListDto<CommentDto>>),
        (status = 400, description = "Work not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(work_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let notifications = NotificationService::new(&state.redis, &state.keys);
    let comments = CommentService::new(&state.db)
        .list(&auth, work_id, &notifications)
        .await?;

    Ok(ok(comments))
}

#[utoipa::path(
    post,
    path = "/api/work/comment",
    tag = COMMENT_TAG,
    security(("bearer" = [])),
    request_body = CreateCommentDto,
    responses(
        (status = 200, description = "Comment created", body = ApiResponse<MessageDto>),
        (status = 400, description = "Empty comment or work not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCommentDto>,
) -> Result<impl IntoResponse, Error> {
    let notifications = NotificationService::new(&state.redis, &state.keys);
    CommentService::new(&state.db)
        .create(&auth, payload, &notifications)
        .await?;

    Ok(message("success create!"))
}

/// Edits a comment of the caller
#[utoipa::path(
    put,
    path = "/api/work/comment/{id}",
    tag = COMMENT_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Comment id")),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or comment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCommentDto>,
) -> Result<impl IntoResponse, Error> {
    let notifications = NotificationService::new(&state.redis, &state.keys);
    CommentService::new(&state.db)
        .update(&auth, id, payload, &notifications)
        .await?;

    Ok(message("success update!"))
}

/// Deletes a comment of the caller; admins may delete any comment
#[utoipa::path(
    delete,
    path = "/api/work/comment/{id}",
    tag = COMMENT_TAG,
    security(("bearer" = [])),
    params(("id" = i32, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment deleted", body = ApiResponse<MessageDto>),
        (status = 400, description = "Not permitted or comment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let notifications = NotificationService::new(&state.redis, &state.keys);
    CommentService::new(&state.db)
        .delete(&auth, id, &notifications)
        .await?;

    Ok(message("success delete!"))
}
