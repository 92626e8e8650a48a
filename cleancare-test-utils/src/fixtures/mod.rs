//! Test fixture modules for database rows and in-memory models.
//!
//! - `user` - roles and users
//! - `work` - tasks, task types, work entries and comments
//! - `factory` - pure model constructors for unit tests

pub mod factory;
pub mod user;
pub mod work;
