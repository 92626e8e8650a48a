use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::auth::ForgotPasswordDto,
    server::{
        controller::{
            auth::{forgot_password, validate_reset_password},
            extract::ClientIp,
        },
        model::app::AppState,
        service::{session::SessionService, token::RESET_TOKEN_TTL_SECS},
        util::password::verify_password,
    },
};
use cleancare_test_utils::{prelude::*, RedisTest};
use fred::{prelude::*, types::Expiration};
use mockito::Matcher;
use sea_orm::EntityTrait;

use super::redis_state;
use crate::util::{body_json, body_text, password_hash, TEST_PASSWORD};

/// Stores a reset token the way the forgot password flow does
async fn store_reset_token(
    state: &AppState,
    redis: &RedisTest,
    user_id: i32,
) -> Result<String, TestError> {
    let token = state.tokens.issue_reset(user_id).expect("reset token");
    let _: () = redis
        .redis_pool
        .set(
            state.keys.reset_token(&token),
            user_id,
            Some(Expiration::EX(RESET_TOKEN_TTL_SECS)),
            None,
            false,
        )
        .await?;

    Ok(token)
}

/// Expect the reset link to be mailed to a known address
#[tokio::test]
async fn mails_reset_link() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/emails")
                .match_body(Matcher::AllOf(vec![
                    Matcher::Regex("lina@example.com".to_string()),
                    Matcher::Regex("/api/auth/validation/reset-password/".to_string()),
                ]))
                .with_status(200)
                .with_body("{}")
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let redis = RedisTest::new().await?;
    test.user()
        .insert_registered_user("NID6001", ROLE_ID_STAFF, "lina@example.com", &password_hash())
        .await?;

    let state = redis_state(&test, &redis);
    let response = forgot_password(
        State(state),
        ClientIp("10.2.2.2".to_string()),
        Json(ForgotPasswordDto {
            email: "lina@example.com".to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["message"],
        "success send email forgot password!"
    );
    test.assert_mocks();

    Ok(())
}

/// Expect an unknown address to answer 401 without sending mail
#[tokio::test]
async fn rejects_unknown_email() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);

    let response = forgot_password(
        State(state),
        ClientIp("10.2.2.3".to_string()),
        Json(ForgotPasswordDto {
            email: "nobody@example.com".to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "email not found");

    Ok(())
}

/// Expect a reset token to work exactly once and replace the password
#[tokio::test]
async fn reset_token_is_single_use() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/emails")
                .match_body(Matcher::Regex("yanti@example.com".to_string()))
                .with_status(200)
                .with_body("{}")
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let redis = RedisTest::new().await?;
    let old_hash = password_hash();
    let user = test
        .user()
        .insert_registered_user("NID6002", ROLE_ID_STAFF, "yanti@example.com", &old_hash)
        .await?;

    let state = redis_state(&test, &redis);
    let token = store_reset_token(&state, &redis, user.id).await?;

    let page = validate_reset_password(State(state.clone()), Path(token.clone()))
        .await
        .into_response();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("yanti@example.com"));

    let stored = entity::prelude::User::find_by_id(user.id)
        .one(&test.db)
        .await?
        .expect("user still exists");
    assert_ne!(stored.password, Some(old_hash));

    let page = validate_reset_password(State(state), Path(token))
        .await
        .into_response();
    assert!(body_text(page).await.contains("your token is invalid"));
    test.assert_mocks();

    Ok(())
}

/// Expect a reset whose mail cannot be delivered to leave the password and logins untouched
#[tokio::test]
async fn undelivered_reset_keeps_old_password() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/emails")
                .with_status(503)
                .with_body("unavailable")
                .expect(1)
                .create()
        })
        .build()
        .await?;
    let redis = RedisTest::new().await?;
    let user = test
        .user()
        .insert_registered_user("NID6003", ROLE_ID_STAFF, "dewi@example.com", &password_hash())
        .await?;

    let state = redis_state(&test, &redis);
    SessionService::new(&state.redis, &state.keys)
        .register_login(user.id, "login-dewi")
        .await
        .expect("login registered");
    let token = store_reset_token(&state, &redis, user.id).await?;

    let page = validate_reset_password(State(state.clone()), Path(token))
        .await
        .into_response();
    assert!(body_text(page).await.contains("Mail API answered 503"));

    let stored = entity::prelude::User::find_by_id(user.id)
        .one(&test.db)
        .await?
        .expect("user still exists");
    assert!(verify_password(TEST_PASSWORD, &stored.password.unwrap_or_default()));
    let revoked = SessionService::new(&state.redis, &state.keys)
        .is_revoked("login-dewi")
        .await
        .expect("revocation readable");
    assert!(!revoked);
    test.assert_mocks();

    Ok(())
}
