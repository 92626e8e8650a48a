use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    task::TaskDto,
    user::FileViewDto,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkUserDto {
    pub id: i32,
    pub name: String,
    pub profile: Option<FileViewDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkDto {
    pub id: i32,
    pub user: WorkUserDto,
    pub task: TaskDto,
    pub task_type: TaskDto,
    pub floor: String,
    pub info: String,
    pub created_at: NaiveDateTime,
    /// Whether the requesting user has unread comments on this work
    pub unread_comment: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkDetailDto {
    #[serde(flatten)]
    pub work: WorkDto,
    pub image_before: Option<FileViewDto>,
    pub image_after: Option<FileViewDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FloorSummaryDto {
    pub floor: String,
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub user_id: i32,
    pub name: String,
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskTypeSummaryDto {
    pub task_type_id: i32,
    pub name: String,
    pub count: i64,
}

/// Admin dashboard, grouped by floor for daily work and by user otherwise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardAdminDto {
    Floor(Vec<FloorSummaryDto>),
    User(Vec<UserSummaryDto>),
}

/// Multipart body of the work create endpoint
#[derive(ToSchema)]
pub struct CreateWorkFormDto {
    pub task_id: i32,
    pub task_type_id: i32,
    pub floor: String,
    pub info: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image_before: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image_after: Option<Vec<u8>>,
}

/// Multipart body of the work update endpoint; every field is optional
#[derive(ToSchema)]
pub struct UpdateWorkFormDto {
    pub task_id: Option<i32>,
    pub task_type_id: Option<i32>,
    pub floor: Option<String>,
    pub info: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image_before: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image_after: Option<Vec<u8>>,
    pub delete_image_before: Option<bool>,
    pub delete_image_after: Option<bool>,
}
