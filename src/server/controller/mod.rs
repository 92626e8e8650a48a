//! HTTP controller endpoints of the CleanCare API.
//!
//! Axum handlers for authentication, master data, users, work entries and comments, plus the
//! websocket that pushes unread comment badges. Handlers extract the caller with
//! [`extract::AuthUser`](crate::server::model::auth::AuthUser), delegate to the services and wrap
//! results in the success envelope. Every handler carries a utoipa path for the OpenAPI document.

pub mod auth;
pub mod comment;
pub mod extract;
pub mod form;
pub mod home;
pub mod response;
pub mod role;
pub mod task;
pub mod user;
pub mod websocket;
pub mod work;
