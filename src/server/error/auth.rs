use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization header is missing or is not a bearer token")]
    MissingToken,
    #[error("Token could not be decoded")]
    InvalidToken,
    #[error("Token is expired")]
    ExpiredToken,
    #[error("Token belongs to a revoked login")]
    RevokedToken,
    #[error("Token has been refreshed too many times")]
    RefreshLimitReached,
    #[error("number id or password is incorrect")]
    InvalidCredentials,
    #[error("email not found")]
    EmailNotFound,
    #[error("wrong id number")]
    WrongNumberId,
    #[error("user already registered")]
    AlreadyRegistered,
    #[error("user not found")]
    UnknownUser,
    #[error("your token is invalid")]
    InvalidResetToken,
    #[error("this role is not permitted")]
    RoleNotPermitted,
    #[error("this user is not permitted")]
    UserNotPermitted,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::MissingToken | Self::InvalidToken => {
                error_response(StatusCode::UNAUTHORIZED, "invalid_token")
            }
            Self::ExpiredToken => error_response(StatusCode::UNAUTHORIZED, self.to_string()),
            Self::RevokedToken | Self::RefreshLimitReached => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "expired_token")
            }
            Self::InvalidCredentials
            | Self::EmailNotFound
            | Self::WrongNumberId
            | Self::AlreadyRegistered
            | Self::UnknownUser => error_response(StatusCode::UNAUTHORIZED, self.to_string()),
            Self::InvalidResetToken | Self::RoleNotPermitted | Self::UserNotPermitted => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
        }
    }
}
