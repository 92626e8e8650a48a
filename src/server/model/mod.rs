//! Server application models and type definitions.
//!
//! Application state, database model aliases, authentication claims, list query parameters
//! and the Redis key layout.

pub mod app;
pub mod auth;
pub mod db;
pub mod form;
pub mod query;
pub mod redis;
