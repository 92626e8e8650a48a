use axum::{
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::auth::LoginDto,
    server::{
        controller::{auth::login, extract::ExpiredAuthUser},
        error::{auth::AuthError, Error},
        model::auth::AuthUser,
    },
};
use cleancare_test_utils::prelude::*;

use super::*;
use crate::util::{password_hash, TEST_PASSWORD};

/// Expect a wrong password to answer 401 with the generic credentials message
#[tokio::test]
async fn rejects_wrong_password() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    test.user()
        .insert_registered_user("NID3001", ROLE_ID_STAFF, "budi@example.com", &password_hash())
        .await?;

    let response = login(
        State(offline_state(&test)),
        Json(LoginDto {
            number_id: "NID3001".to_string(),
            password: "not-the-password".to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "number id or password is incorrect"
    );

    Ok(())
}

/// Expect users that never registered to be unable to log in
#[tokio::test]
async fn rejects_unregistered_user() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    test.user().insert_user("NID3002", ROLE_ID_STAFF).await?;

    let response = login(
        State(offline_state(&test)),
        Json(LoginDto {
            number_id: "NID3002".to_string(),
            password: TEST_PASSWORD.to_string(),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect the extractor to reject a request without an authorization header
#[tokio::test]
async fn extractor_requires_bearer_token() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let state = offline_state(&test);

    let (mut parts, _) = Request::builder()
        .uri("/api/user/info")
        .body(())
        .expect("valid request")
        .into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &state).await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::MissingToken))
    ));

    Ok(())
}

/// Expect a malformed token to be invalid even where expiry is not checked
#[tokio::test]
async fn expired_extractor_rejects_garbage() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let state = offline_state(&test);

    let (mut parts, _) = Request::builder()
        .uri("/api/auth/logout")
        .header("Authorization", "Bearer garbage")
        .body(())
        .expect("valid request")
        .into_parts();

    let result = ExpiredAuthUser::from_request_parts(&mut parts, &state).await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::InvalidToken))
    ));

    Ok(())
}
