use fred::prelude::Pool;
use sea_orm::DatabaseConnection;

use crate::server::{
    model::redis::RedisKeys,
    service::{
        mail::Mailer, notification::NotificationHub, storage::DriveClient, token::TokenService,
    },
};

/// Application name, version and public URL
#[derive(Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: Pool,
    pub keys: RedisKeys,
    pub tokens: TokenService,
    pub storage: DriveClient,
    pub mailer: Mailer,
    pub notifications: NotificationHub,
    pub info: AppInfo,
}
