use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to obtain drive access token: {0}")]
    Token(String),
    #[error("Drive request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Drive answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Drive response is missing field {0}")]
    MissingField(&'static str),
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);

        error_response(StatusCode::BAD_GATEWAY, "failed to process file")
    }
}
