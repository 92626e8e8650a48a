use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    /// Always `false`
    pub success: bool,
    /// HTTP status code
    pub code: u16,
    /// The error message
    pub error: String,
}

/// Envelope wrapping every successful JSON response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: 200,
            data,
        }
    }
}

/// A page of results together with the total number of matching rows
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ListDto<T> {
    pub count: u64,
    pub data: Vec<T>,
}

/// Confirmation returned by endpoints that have nothing else to answer with
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}
