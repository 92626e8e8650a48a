//! Application state and request helpers shared by the integration tests.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Multipart},
    http::{header::CONTENT_TYPE, Request},
    response::Response,
};
use cleancare::server::{
    model::{
        app::{AppInfo, AppState},
        auth::AuthUser,
        redis::RedisKeys,
    },
    service::{
        mail::Mailer,
        notification::NotificationHub,
        storage::{DriveClient, DriveSettings},
        token::TokenService,
    },
    util::password::hash_password,
};
use cleancare_test_utils::TestSetup;
use fred::prelude::{Config, Pool};

pub static TEST_JWT_SECRET: &str = "integration-test-secret";
pub static TEST_PASSWORD: &str = "Secret123";

/// Builds the application state around the test database, pointing drive and mail at the mock
/// server
pub fn test_state(test: &TestSetup, redis: Pool, keys: RedisKeys) -> AppState {
    let mock_url = test.mock_url();

    let storage = DriveClient::new(DriveSettings {
        api_url: mock_url.clone(),
        token_url: format!("{}/token", mock_url),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        refresh_token: "refresh".to_string(),
        parent_id: "parent".to_string(),
    })
    .expect("mock drive settings are valid");

    AppState {
        db: test.db.clone(),
        redis,
        keys,
        tokens: TokenService::new(TEST_JWT_SECRET),
        storage,
        mailer: Mailer::new(&format!("{}/emails", mock_url), "mail-key", "noreply@cleancare.test"),
        notifications: NotificationHub::new(),
        info: AppInfo {
            name: "CleanCare".to_string(),
            version: "1.0.0".to_string(),
            base_url: "http://localhost:8080".to_string(),
        },
    }
}

/// State with a Redis pool that is never connected, for handlers that fail before reaching it
pub fn offline_state(test: &TestSetup) -> AppState {
    let redis = Pool::new(Config::default(), None, None, None, 1).expect("default redis config");

    test_state(test, redis, RedisKeys::new("offline"))
}

pub fn auth_user(id: i32, role_id: i32) -> AuthUser {
    AuthUser {
        id,
        role_id,
        email: format!("user{}@example.com", id),
        uuid: format!("login-{}", id),
    }
}

pub fn password_hash() -> String {
    hash_password(TEST_PASSWORD).expect("password hashes")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body is readable");

    serde_json::from_slice(&bytes).expect("response body is json")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body is readable");

    String::from_utf8_lossy(&bytes).to_string()
}

/// Multipart body made of text fields only
pub async fn multipart(fields: &[(&str, &str)]) -> Multipart {
    let boundary = "cleancare-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    let request = Request::builder()
        .method("POST")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("valid request");

    Multipart::from_request(request, &())
        .await
        .expect("multipart content type")
}
