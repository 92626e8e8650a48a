use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskDto {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskTypeDto {
    pub id: i32,
    pub name: String,
    pub task_id: i32,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateTaskTypeDto {
    pub name: String,
    pub task_id: i32,
}

#[derive(Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskTypeDto {
    pub name: Option<String>,
    pub task_id: Option<i32>,
}
