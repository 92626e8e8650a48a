use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::auth::VerifyNumberDto,
    server::{
        controller::{auth::verify_number, extract::ClientIp},
        model::redis::{RateLimitKind, RedisKeys},
        service::rate_limit::RateLimiter,
    },
};
use cleancare_test_utils::{prelude::*, RedisTest};
use fred::prelude::*;

use super::redis_state;
use crate::util::body_json;

/// Expect the sixth reset attempt from one address to be refused
#[tokio::test]
async fn limits_reset_attempts() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let keys = RedisKeys::new(redis.prefix());
    let limiter = RateLimiter::new(&redis.redis_pool, &keys);

    for _ in 0..5 {
        assert!(limiter
            .check(RateLimitKind::ResetPassword, "10.0.0.1")
            .await
            .is_ok());
    }

    assert!(limiter
        .check(RateLimitKind::ResetPassword, "10.0.0.1")
        .await
        .is_err());
    assert!(limiter
        .check(RateLimitKind::ResetPassword, "10.0.0.2")
        .await
        .is_ok());

    let ttl: i64 = redis
        .redis_pool
        .ttl(keys.rate_limit(RateLimitKind::ResetPassword, "10.0.0.1"))
        .await?;
    assert!(ttl > 0);

    Ok(())
}

/// Expect IPv6 loopback to share the counter of `localhost`
#[tokio::test]
async fn counts_loopback_as_localhost() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let keys = RedisKeys::new(redis.prefix());
    let limiter = RateLimiter::new(&redis.redis_pool, &keys);

    assert!(limiter.check(RateLimitKind::Register, "::1").await.is_ok());

    let attempts: i64 = redis
        .redis_pool
        .get(keys.rate_limit(RateLimitKind::Register, "localhost"))
        .await?;
    assert_eq!(attempts, 1);

    Ok(())
}

/// Expect number verification to answer the user and stop after ten attempts
#[tokio::test]
async fn verify_number_is_rate_limited() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);
    test.user().insert_user("NID5001", ROLE_ID_STAFF).await?;

    let verify = || {
        verify_number(
            State(state.clone()),
            ClientIp("10.9.9.9".to_string()),
            Json(VerifyNumberDto {
                number_id: "NID5001".to_string(),
            }),
        )
    };

    let response = verify().await.into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["number_id"], "NID5001");

    for _ in 0..9 {
        assert_eq!(verify().await.into_response().status(), StatusCode::OK);
    }

    let response = verify().await.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "too many attempts, please try again in 4 hours"
    );

    Ok(())
}
