use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Mail API answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Mail body of \"{0}\" is empty")]
    EmptyBody(String),
}

impl IntoResponse for MailError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);

        error_response(StatusCode::BAD_GATEWAY, "failed to send email")
    }
}
