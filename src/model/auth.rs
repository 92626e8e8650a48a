use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginDto {
    pub number_id: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub token: String,
    pub data: UserDto,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TokenDto {
    pub token: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ForgotPasswordDto {
    pub email: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct VerifyNumberDto {
    pub number_id: String,
}

/// Multipart body of the registration endpoint
#[derive(ToSchema)]
pub struct RegisterFormDto {
    pub number_id: String,
    pub email: String,
    pub password: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile: Option<Vec<u8>>,
}
