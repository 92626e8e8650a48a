use fred::{prelude::*, types::Builder};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    error::Error,
    model::{
        app::{AppInfo, AppState},
        redis::RedisKeys,
    },
    service::{
        mail::Mailer,
        notification::NotificationHub,
        storage::{DriveClient, DriveSettings, APP_FOLDER},
        token::TokenService,
    },
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;

    tracing::info!("Connected to database, migrations applied");

    Ok(db)
}

/// Connect to Valkey/Redis for sessions, rate limits and unread comments
pub async fn connect_to_redis(config: &Config) -> Result<Pool, Error> {
    let redis_config = fred::prelude::Config::from_url(&config.valkey_url)?;
    let pool = Pool::new(redis_config, None, None, None, 6)?;

    pool.init().await?;

    tracing::info!("Connected to Redis");

    Ok(pool)
}

/// Subscribe to the notification channels and bridge them into a [`NotificationHub`]
pub async fn start_notification_hub(
    config: &Config,
    keys: &RedisKeys,
) -> Result<NotificationHub, Error> {
    let redis_config = fred::prelude::Config::from_url(&config.valkey_url)?;
    let subscriber = Builder::from_config(redis_config).build_subscriber_client()?;
    subscriber.init().await?;
    // Resubscribe after reconnects
    let _ = subscriber.manage_subscriptions();

    let hub = NotificationHub::new();
    hub.listen(subscriber, keys.clone()).await?;

    tracing::info!("Listening for notifications on {}", keys.notification_pattern());

    Ok(hub)
}

/// Authorize the drive account and make sure the application folder exists
pub async fn connect_to_drive(config: &Config) -> Result<DriveClient, Error> {
    let drive = DriveClient::new(DriveSettings::from(config))?;
    let folder_id = drive.init_folder(APP_FOLDER).await?;

    tracing::info!("Using drive folder {} ({})", APP_FOLDER, folder_id);

    Ok(drive)
}

/// Connect every backing service and assemble the application state
pub async fn build_state(config: &Config) -> Result<AppState, Error> {
    let keys = RedisKeys::new(config.redis_prefix.clone());

    let db = connect_to_database(config).await?;
    let redis = connect_to_redis(config).await?;
    let notifications = start_notification_hub(config, &keys).await?;
    let storage = connect_to_drive(config).await?;

    Ok(AppState {
        db,
        redis,
        keys,
        tokens: TokenService::new(config.jwt_secret.as_str()),
        storage,
        mailer: Mailer::from_config(config),
        notifications,
        info: AppInfo {
            name: config.app_name.clone(),
            version: config.app_version.clone(),
            base_url: config.base_url.clone(),
        },
    })
}
