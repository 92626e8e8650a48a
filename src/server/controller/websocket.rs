//! Real-time unread comment badge.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use utoipa::IntoParams;

use crate::{
    model::{api::ErrorDto, notification::NotificationDto},
    server::{
        controller::extract::authorize,
        error::{auth::AuthError, Error},
        model::{app::AppState, auth::AuthUser},
        service::notification::{NotificationService, UserNotification},
    },
};

pub static WEBSOCKET_TAG: &str = "websocket";

/// Browsers cannot set headers on a websocket handshake, so the token travels in the query
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WebsocketQuery {
    pub token: Option<String>,
}

/// Streams `{count, is_new}` badge updates of the caller
///
/// The current count is sent right after the upgrade, then every change until the socket closes.
#[utoipa::path(
    get,
    path = "/api/websocket",
    tag = WEBSOCKET_TAG,
    params(WebsocketQuery),
    responses(
        (status = 101, description = "Switching to the websocket protocol"),
        (status = 401, description = "Missing or invalid token", body = ErrorDto),
        (status = 422, description = "Login has been revoked", body = ErrorDto)
    ),
)]
pub async fn websocket(
    State(state): State<AppState>,
    Query(query): Query<WebsocketQuery>,
    upgrade: WebSocketUpgrade,
) -> Result<impl IntoResponse, Error> {
    let token = query
        .token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;
    let auth = authorize(&state, &token, true).await?;

    Ok(upgrade.on_upgrade(move |socket| stream_notifications(socket, state, auth)))
}

async fn send(socket: &mut WebSocket, notification: &NotificationDto) -> bool {
    let payload = match serde_json::to_string(notification) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize notification: {}", e);
            return false;
        }
    };

    socket.send(Message::Text(payload.into())).await.is_ok()
}

async fn stream_notifications(mut socket: WebSocket, state: AppState, auth: AuthUser) {
    // Subscribe before reading the count so no update is missed in between
    let mut events = state.notifications.subscribe();

    let count = match NotificationService::new(&state.redis, &state.keys)
        .unread_count(auth.id)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Failed to read unread count of user {}: {}", auth.id, e);
            0
        }
    };
    if !send(&mut socket, &NotificationDto { count, is_new: false }).await {
        return;
    }

    tracing::debug!("Websocket of user {} connected", auth.id);

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            event = events.recv() => match event {
                Ok(UserNotification { user_id, notification }) if user_id == auth.id => {
                    if !send(&mut socket, &notification).await {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Websocket of user {} skipped {} notifications",
                        auth.id,
                        skipped
                    );
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    tracing::debug!("Websocket of user {} disconnected", auth.id);
}
