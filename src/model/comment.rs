use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentAuthorDto {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: i32,
    pub work_id: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub created_by: CommentAuthorDto,
    pub updated_by: Option<CommentAuthorDto>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateCommentDto {
    pub work_id: i32,
    pub comment: String,
}

#[derive(Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCommentDto {
    pub comment: Option<String>,
}
