use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::user::CreateUserDto,
    server::{
        controller::user::{
            create_user, export_users, get_user, list_users, reset_password, update_user,
            user_info,
        },
        model::query::ListQuery,
        util::password::verify_password,
    },
};
use sea_orm::EntityTrait;
use cleancare_test_utils::prelude::*;

use super::*;
use crate::util::{multipart, password_hash, TEST_PASSWORD};

fn new_staff(number_id: &str) -> CreateUserDto {
    CreateUserDto {
        number_id: number_id.to_string(),
        name: "Siti".to_string(),
        role_id: ROLE_ID_STAFF,
        floor: Some("2".to_string()),
    }
}

/// Expect a created user to be listed as unverified without an email
#[tokio::test]
async fn creates_unregistered_user() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let state = offline_state(&test);

    let response = create_user(
        State(state.clone()),
        auth_user(1, ROLE_ID_ADMIN),
        Json(new_staff("NID1001")),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let response = list_users(
        State(state),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            number_id: Some("NID1001".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["data"][0]["email"], "-");
    assert_eq!(body["data"]["data"][0]["verified"], false);
    assert_eq!(body["data"]["data"][0]["role"]["id"], ROLE_ID_STAFF);

    Ok(())
}

/// Expect a second user with the same number id to be rejected
#[tokio::test]
async fn rejects_duplicate_number_id() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    test.user().insert_user("NID1001", ROLE_ID_STAFF).await?;

    let response = create_user(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Json(new_staff("NID1001")),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "number id already exist");

    Ok(())
}

/// Expect the info endpoint to describe the caller
#[tokio::test]
async fn returns_caller_info() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let user = test
        .user()
        .insert_registered_user("NID1002", ROLE_ID_STAFF, "siti@example.com", &password_hash())
        .await?;

    let response = user_info(
        State(offline_state(&test)),
        auth_user(user.id, ROLE_ID_STAFF),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["number_id"], "NID1002");
    assert_eq!(body["data"]["email"], "siti@example.com");
    assert_eq!(body["data"]["verified"], true);

    Ok(())
}

/// Expect an unknown id to answer 400 user not found
#[tokio::test]
async fn unknown_user_is_bad_request() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;

    let response = get_user(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Path(404),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "user not found");

    Ok(())
}

/// Expect users to rename themselves through the multipart form
#[tokio::test]
async fn updates_own_name() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let state = offline_state(&test);
    let user = test.user().insert_user("NID1003", ROLE_ID_STAFF).await?;

    let response = update_user(
        State(state.clone()),
        auth_user(user.id, ROLE_ID_STAFF),
        Path(user.id),
        multipart(&[("name", "Siti Rahma")]).await,
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_user(
        State(state),
        auth_user(user.id, ROLE_ID_STAFF),
        Path(user.id),
    )
    .await
    .into_response();
    assert_eq!(body_json(response).await["data"]["name"], "Siti Rahma");

    Ok(())
}

/// Expect staff to be unable to update someone else
#[tokio::test]
async fn refuses_update_of_other_user() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let user = test.user().insert_user("NID1004", ROLE_ID_STAFF).await?;

    let response = update_user(
        State(offline_state(&test)),
        auth_user(user.id + 1, ROLE_ID_STAFF),
        Path(user.id),
        multipart(&[("name", "Someone")]).await,
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "this user is not permitted");

    Ok(())
}

/// Expect a non numeric role id in the form to be a validation error
#[tokio::test]
async fn rejects_invalid_role_id() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let user = test.user().insert_user("NID1005", ROLE_ID_STAFF).await?;

    let response = update_user(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Path(user.id),
        multipart(&[("role_id", "admin")]).await,
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "role_id is invalid");

    Ok(())
}

/// Expect the user export to be limited to admins
#[tokio::test]
async fn refuses_staff_export() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;

    let response = export_users(
        State(offline_state(&test)),
        auth_user(2, ROLE_ID_STAFF),
        Query(ListQuery {
            format: Some("excel".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "this role is not permitted");

    Ok(())
}

/// Expect the old password to keep working when the new one could not be mailed
#[tokio::test]
async fn failed_reset_mail_keeps_old_password() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .with_mock_endpoint(|server| {
            server
                .mock("POST", "/emails")
                .with_status(500)
                .with_body("mail server down")
                .create()
        })
        .build()
        .await?;
    let admin = test
        .user()
        .insert_registered_user("NID0001", ROLE_ID_ADMIN, "admin@example.com", &password_hash())
        .await?;
    let staff = test
        .user()
        .insert_registered_user("NID1001", ROLE_ID_STAFF, "staff@example.com", &password_hash())
        .await?;

    let response = reset_password(
        State(offline_state(&test)),
        auth_user(admin.id, ROLE_ID_ADMIN),
        Path(staff.id),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let stored = entity::prelude::User::find_by_id(staff.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert!(verify_password(TEST_PASSWORD, &stored.password.unwrap()));
    test.assert_mocks();

    Ok(())
}
