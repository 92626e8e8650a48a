//! Error types for the CleanCare server.
//!
//! Each domain (authentication, configuration, file storage, mail) has its own error enum
//! with its own `IntoResponse` mapping. [`Error`] aggregates them together with the library
//! errors so handlers can use `?` throughout. Anything without a dedicated mapping becomes a
//! logged 500 response.

pub mod auth;
pub mod config;
pub mod mail;
pub mod storage;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, mail::MailError, storage::StorageError},
};

/// Main error type for the CleanCare server.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or permission failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Cloud storage failure.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// Mail delivery failure.
    #[error(transparent)]
    MailError(#[from] MailError),
    /// A business rule rejected the request.
    #[error("{0}")]
    BadRequest(String),
    /// A referenced record does not exist.
    ///
    /// Answered with 400 like every other business rule failure.
    #[error("{0}")]
    NotFound(String),
    /// The request payload could not be interpreted.
    #[error("{0}")]
    Validation(String),
    /// Too many attempts from the same client address.
    #[error("too many attempts, please try again in 4 hours")]
    TooManyAttempts,
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in CleanCare's code.
    #[error("Internal error: {0}")]
    InternalError(String),
    /// Multipart body could not be read.
    #[error(transparent)]
    MultipartError(#[from] MultipartError),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Redis error (connection, command execution).
    #[error(transparent)]
    RedisError(#[from] fred::error::Error),
    /// Token encoding or decoding error.
    #[error(transparent)]
    JwtError(#[from] jsonwebtoken::errors::Error),
    /// Claim cipher error.
    #[error(transparent)]
    CryptoError(#[from] openssl::error::ErrorStack),
    /// Spreadsheet generation error.
    #[error(transparent)]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),
    /// PDF generation error.
    #[error("Failed to render PDF: {0}")]
    PdfError(String),
    /// JSON serialization error.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - business rule, lookup and validation failures
/// - 401 / 422 - see [`AuthError`]
/// - 502 Bad Gateway - storage and mail failures
/// - 500 Internal Server Error - everything else (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::StorageError(err) => err.into_response(),
            Self::MailError(err) => err.into_response(),
            Self::BadRequest(message) | Self::NotFound(message) | Self::Validation(message) => {
                tracing::debug!("{}", message);

                error_response(StatusCode::BAD_REQUEST, message)
            }
            Self::TooManyAttempts => {
                tracing::debug!("{}", self);

                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::MultipartError(err) => {
                tracing::debug!("{}", err);

                error_response(StatusCode::BAD_REQUEST, "error bind multipart/form-data")
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Builds the JSON error body shared by every error response.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            success: false,
            code: status.as_u16(),
            error: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// The full error is logged while the client only receives a generic message.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
