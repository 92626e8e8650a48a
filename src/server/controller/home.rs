use axum::{extract::State, response::IntoResponse};

use crate::server::model::app::AppState;

pub static HOME_TAG: &str = "home";

/// Greets with the application name and version
#[utoipa::path(
    get,
    path = "/",
    tag = HOME_TAG,
    responses(
        (status = 200, description = "Welcome message", body = String),
    ),
)]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    format!(
        "Hello there, welcome to app {} version {}.",
        state.info.name, state.info.version
    )
}
