//! Utility functions shared by services and controllers.

pub mod crypto;
pub mod image;
pub mod password;
pub mod template;
pub mod time;
