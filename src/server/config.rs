use crate::server::error::config::ConfigError;

pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub bind_address: String,
    pub base_url: String,
    pub database_url: String,
    pub valkey_url: String,
    pub redis_prefix: String,
    pub jwt_secret: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub drive_api_url: String,
    pub drive_token_url: String,
    pub drive_client_id: String,
    pub drive_client_secret: String,
    pub drive_refresh_token: String,
    pub drive_parent_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app_name: optional("APP_NAME", "CleanCare"),
            app_version: optional("APP_VERSION", env!("CARGO_PKG_VERSION")),
            bind_address: optional("BIND_ADDRESS", "0.0.0.0:8080"),
            base_url: required("BASE_URL")?,
            database_url: required("DATABASE_URL")?,
            valkey_url: required("VALKEY_URL")?,
            redis_prefix: optional("REDIS_PREFIX", "cleancare"),
            jwt_secret: required("JWT_SECRET")?,
            mail_api_url: required("MAIL_API_URL")?,
            mail_api_key: required("MAIL_API_KEY")?,
            mail_from: required("MAIL_FROM")?,
            drive_api_url: optional("DRIVE_API_URL", "https://www.googleapis.com"),
            drive_token_url: optional("DRIVE_TOKEN_URL", "https://oauth2.googleapis.com/token"),
            drive_client_id: required("DRIVE_CLIENT_ID")?,
            drive_client_secret: required("DRIVE_CLIENT_SECRET")?,
            drive_refresh_token: required("DRIVE_REFRESH_TOKEN")?,
            drive_parent_id: required("DRIVE_PARENT_ID")?,
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: "value is empty".to_string(),
        }),
        Err(_) => Err(ConfigError::MissingEnvVar(var.to_string())),
    }
}

fn optional(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
