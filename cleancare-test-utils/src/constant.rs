//! Identifiers shared between the seed data and the fixtures.
//!
//! The server crate carries its own copies of these values; they are repeated here so
//! fixtures can insert rows without depending on the server crate.

pub const ROLE_ID_ADMIN: i32 = 1;
pub const ROLE_ID_STAFF: i32 = 2;

pub const TASK_ID_DAILY: i32 = 1;
pub const TASK_ID_SERVICE: i32 = 2;

/// Token endpoint answer granting the bearer `drive-token`
pub const DRIVE_TOKEN_BODY: &str =
    r#"{"access_token":"drive-token","token_type":"bearer","expires_in":3600}"#;

/// Redis instance used by tests behind the `redis-test` feature.
pub static TEST_REDIS_URL: &str = "redis://127.0.0.1:6379";
