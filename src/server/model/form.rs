//! Multipart form payloads after they have been read from the request.

/// A file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub number_id: String,
    pub email: String,
    pub password: String,
    pub profile: Option<UploadedFile>,
}

#[derive(Debug, Default, Clone)]
pub struct UpdateUserForm {
    pub number_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i32>,
    pub floor: Option<String>,
    pub profile: Option<UploadedFile>,
    pub delete_profile: bool,
}

#[derive(Debug, Clone)]
pub struct CreateWorkForm {
    pub task_id: i32,
    pub task_type_id: i32,
    pub floor: String,
    pub info: String,
    pub image_before: Option<UploadedFile>,
    pub image_after: Option<UploadedFile>,
}

#[derive(Debug, Default, Clone)]
pub struct UpdateWorkForm {
    pub task_id: Option<i32>,
    pub task_type_id: Option<i32>,
    pub floor: Option<String>,
    pub info: Option<String>,
    pub image_before: Option<UploadedFile>,
    pub image_after: Option<UploadedFile>,
    pub delete_image_before: bool,
    pub delete_image_after: bool,
}
