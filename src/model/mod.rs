//! Request and response bodies of the HTTP API.

pub mod api;
pub mod auth;
pub mod comment;
pub mod notification;
pub mod role;
pub mod task;
pub mod user;
pub mod work;
