use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::task::{CreateTaskTypeDto, UpdateTaskTypeDto},
    server::{
        controller::task::{
            create_task_type, delete_task_type, list_task_types, list_tasks, update_task_type,
        },
        model::query::ListQuery,
    },
};
use cleancare_test_utils::prelude::*;

use super::*;

/// Expect both seeded tasks to be listed
#[tokio::test]
async fn lists_tasks() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = list_tasks(
        State(offline_state(&test)),
        auth_user(2, ROLE_ID_STAFF),
        Query(ListQuery::default()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 2);

    Ok(())
}

/// Expect an admin to create a task type that then shows up in the list
#[tokio::test]
async fn creates_and_lists_task_type() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let state = offline_state(&test);

    let response = create_task_type(
        State(state.clone()),
        auth_user(1, ROLE_ID_ADMIN),
        Json(CreateTaskTypeDto {
            name: "Toilet".to_string(),
            task_id: TASK_ID_DAILY,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["message"], "success create!");

    let response = list_task_types(
        State(state),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            task_id: Some(TASK_ID_DAILY),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["data"][0]["name"], "Toilet");

    Ok(())
}

/// Expect a blank name to be rejected before anything is stored
#[tokio::test]
async fn rejects_blank_name() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = create_task_type(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Json(CreateTaskTypeDto {
            name: "   ".to_string(),
            task_id: TASK_ID_DAILY,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "name is required");

    Ok(())
}

/// Expect moving a task type to a missing task to fail
#[tokio::test]
async fn rejects_update_to_missing_task() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let task_type = test.work().insert_task_type("Lobby", TASK_ID_DAILY).await?;

    let response = update_task_type(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Path(task_type.id),
        Json(UpdateTaskTypeDto {
            name: None,
            task_id: Some(99),
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "task not found");

    Ok(())
}

/// Expect a deleted task type to disappear from the list
#[tokio::test]
async fn deletes_task_type() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let state = offline_state(&test);
    let task_type = test.work().insert_task_type("Lobby", TASK_ID_DAILY).await?;

    let response = delete_task_type(
        State(state.clone()),
        auth_user(1, ROLE_ID_ADMIN),
        Path(task_type.id),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let response = list_task_types(
        State(state),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery::default()),
    )
    .await
    .into_response();
    assert_eq!(body_json(response).await["data"]["count"], 0);

    Ok(())
}

/// Expect staff to be refused
#[tokio::test]
async fn refuses_staff_delete() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let task_type = test.work().insert_task_type("Lobby", TASK_ID_DAILY).await?;

    let response = delete_task_type(
        State(offline_state(&test)),
        auth_user(2, ROLE_ID_STAFF),
        Path(task_type.id),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "this role is not permitted");

    Ok(())
}
