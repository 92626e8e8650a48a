use std::net::SocketAddr;

use cleancare::server::{config::Config, router, startup};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let state = match startup::build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to start {}: {}", config.app_name, e);
            std::process::exit(1);
        }
    };

    let app = router::routes().with_state(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_address, e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting {} {} on {}",
        config.app_name,
        config.app_version,
        config.bind_address
    );

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!("Server stopped: {}", e);
    }
}
