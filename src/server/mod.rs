//! Server application core modules.
//!
//! This module contains all server-side functionality of CleanCare: configuration, HTTP
//! routing and handlers, business services, database repositories, the Redis backed session
//! and notification layer, and the cloud drive and mail integrations.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod util;
