//! Data access layer repositories.
//!
//! One repository per table. Every lookup skips soft-deleted rows.

pub mod comment;
pub mod query;
pub mod role;
pub mod task;
pub mod task_type;
pub mod user;
pub mod work;
