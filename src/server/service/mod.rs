//! Service layer implementing the business rules.
//!
//! Services validate requests, check permissions and coordinate the repositories with Redis,
//! the cloud drive and the mail API. Services that only need the database are constructed
//! with a connection; the Redis and HTTP dependencies of an operation are passed to it.

pub mod auth;
pub mod comment;
pub mod export;
pub mod mail;
pub mod notification;
pub mod rate_limit;
pub mod role;
pub mod session;
pub mod storage;
pub mod task;
pub mod token;
pub mod upload;
pub mod user;
pub mod work;
