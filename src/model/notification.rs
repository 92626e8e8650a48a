use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unread comment badge pushed over the websocket
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationDto {
    pub count: u64,
    /// `true` when the event was caused by a new or edited comment
    pub is_new: bool,
}
