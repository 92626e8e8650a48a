use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, Request, StatusCode},
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::auth::LoginDto,
    server::{
        controller::{
            auth::{login, logout, refresh_token},
            extract::ExpiredAuthUser,
            user::delete_user,
        },
        error::{auth::AuthError, Error},
        model::auth::AuthUser,
        service::session::SessionService,
    },
};
use cleancare_test_utils::{prelude::*, RedisTest};
use fred::prelude::*;

use super::redis_state;
use crate::util::{auth_user, body_json, password_hash, TEST_PASSWORD};

fn bearer(token: &str) -> Parts {
    Request::builder()
        .header("Authorization", format!("Bearer {}", token))
        .body(())
        .expect("valid request")
        .into_parts()
        .0
}

async fn login_token(state: &cleancare::server::model::app::AppState, number_id: &str) -> String {
    let response = login(
        State(state.clone()),
        Json(LoginDto {
            number_id: number_id.to_string(),
            password: TEST_PASSWORD.to_string(),
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Expect a login to register its uuid and answer a token the extractor accepts
#[tokio::test]
async fn login_registers_session() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);
    let user = test
        .user()
        .insert_registered_user("NID4001", ROLE_ID_STAFF, "rina@example.com", &password_hash())
        .await?;

    let token = login_token(&state, "NID4001").await;

    let auth = AuthUser::from_request_parts(&mut bearer(&token), &state)
        .await
        .expect("fresh token is accepted");
    assert_eq!(auth.id, user.id);
    assert_eq!(auth.email, "rina@example.com");

    let logins: Vec<String> = redis.redis_pool.smembers(state.keys.login(user.id)).await?;
    assert_eq!(logins, vec![auth.uuid]);

    Ok(())
}

/// Expect logout to forget the login
#[tokio::test]
async fn logout_forgets_login() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);
    let user = test
        .user()
        .insert_registered_user("NID4002", ROLE_ID_STAFF, "dewi@example.com", &password_hash())
        .await?;

    let token = login_token(&state, "NID4002").await;
    let Ok(auth) = ExpiredAuthUser::from_request_parts(&mut bearer(&token), &state).await else {
        panic!("token is accepted");
    };

    let response = logout(State(state.clone()), auth).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let logins: i64 = redis.redis_pool.scard(state.keys.login(user.id)).await?;
    assert_eq!(logins, 0);

    Ok(())
}

/// Expect a refreshed token to keep the login uuid
#[tokio::test]
async fn refresh_keeps_login() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);
    test.user()
        .insert_registered_user("NID4003", ROLE_ID_ADMIN, "agus@example.com", &password_hash())
        .await?;

    let token = login_token(&state, "NID4003").await;
    let Ok(ExpiredAuthUser(auth)) =
        ExpiredAuthUser::from_request_parts(&mut bearer(&token), &state).await
    else {
        panic!("token is accepted");
    };

    let response = refresh_token(State(state.clone()), ExpiredAuthUser(auth.clone()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed = body_json(response).await["data"]["token"]
        .as_str()
        .expect("token in refresh response")
        .to_string();
    let Ok(refreshed_auth) = AuthUser::from_request_parts(&mut bearer(&refreshed), &state).await
    else {
        panic!("refreshed token is accepted");
    };
    assert_eq!(refreshed_auth.uuid, auth.uuid);

    Ok(())
}

/// Expect the refresh counter to give up after thirty refreshes
#[tokio::test]
async fn refresh_limit_requires_new_login() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let keys = cleancare::server::model::redis::RedisKeys::new(redis.prefix());
    let sessions = SessionService::new(&redis.redis_pool, &keys);

    for _ in 0..30 {
        assert!(sessions.increment_refresh("login-1").await.is_ok());
    }
    let result = sessions.increment_refresh("login-1").await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::RefreshLimitReached))
    ));
    assert_eq!(sessions.increment_refresh("login-1").await.ok(), Some(1));

    Ok(())
}

/// Expect deleting a user to revoke the tokens they already hold
#[tokio::test]
async fn deleted_user_is_logged_out() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);
    let user = test
        .user()
        .insert_registered_user("NID4004", ROLE_ID_STAFF, "wati@example.com", &password_hash())
        .await?;

    let token = login_token(&state, "NID4004").await;

    let response = delete_user(State(state.clone()), auth_user(1, ROLE_ID_ADMIN), Path(user.id))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let result = AuthUser::from_request_parts(&mut bearer(&token), &state).await;
    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::RevokedToken))
    ));

    Ok(())
}
