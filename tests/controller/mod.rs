//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with hand built extractors against an in-memory database.
//! Nothing here needs Redis: every request either never touches it or fails before it would.

mod auth;
mod role;
mod router;
mod task;
mod user;
mod work;

use crate::util::{auth_user, body_json, offline_state};
