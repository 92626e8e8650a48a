use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::RoleDto;

/// Public view of a file kept in cloud storage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileViewDto {
    pub id: String,
    pub name: String,
    /// Direct link usable in an `<img>` tag
    pub view: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub number_id: String,
    pub name: String,
    /// `-` until the user registers
    pub email: String,
    pub role: RoleDto,
    pub floor: Option<String>,
    pub verified: bool,
    pub profile: Option<FileViewDto>,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateUserDto {
    pub number_id: String,
    pub name: String,
    pub role_id: i32,
    pub floor: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordDto {
    pub old_password: String,
    pub new_password: String,
}

/// Multipart body of the user update endpoint; every field is optional
#[derive(ToSchema)]
pub struct UpdateUserFormDto {
    pub number_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i32>,
    pub floor: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile: Option<Vec<u8>>,
    /// `true` removes the current profile picture
    pub delete_profile: Option<bool>,
}
