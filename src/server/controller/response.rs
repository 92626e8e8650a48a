use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    model::api::{ApiResponse, MessageDto},
    server::service::export::ExportFile,
};

/// Wraps data in the success envelope
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Success envelope carrying only a confirmation message, e.g. `success create!`
pub fn message(message: &str) -> Json<ApiResponse<MessageDto>> {
    ok(MessageDto {
        message: message.to_string(),
    })
}

/// Sends the file as a download
impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename={}", self.file_name);
        let Ok(disposition) = HeaderValue::from_str(&disposition) else {
            tracing::error!("Export file name {} is not a valid header", self.file_name);

            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(self.content_type)),
                (header::CONTENT_DISPOSITION, disposition),
                (
                    header::ACCESS_CONTROL_EXPOSE_HEADERS,
                    HeaderValue::from_static("Content-Disposition"),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}
