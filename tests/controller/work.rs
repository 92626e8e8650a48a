use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use cleancare::server::{
    controller::work::{
        create_work, dashboard_admin, dashboard_staff, delete_work, export_works, update_work,
    },
    model::query::ListQuery,
};
use cleancare_test_utils::prelude::*;

use super::*;
use crate::util::multipart;

/// Expect staff to log work without photos
#[tokio::test]
async fn staff_logs_work() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let staff = test.user().insert_user("NID2001", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;

    let task_id = TASK_ID_DAILY.to_string();
    let task_type_id = task_type.id.to_string();
    let response = create_work(
        State(offline_state(&test)),
        auth_user(staff.id, ROLE_ID_STAFF),
        multipart(&[
            ("task_id", task_id.as_str()),
            ("task_type_id", task_type_id.as_str()),
            ("floor", "3"),
            ("info", "Lobby mopped"),
        ])
        .await,
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["message"], "success create!");

    Ok(())
}

/// Expect admins to be unable to log work
#[tokio::test]
async fn admin_cannot_log_work() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;

    let task_type_id = task_type.id.to_string();
    let response = create_work(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        multipart(&[
            ("task_id", "1"),
            ("task_type_id", task_type_id.as_str()),
            ("floor", "3"),
            ("info", "Lobby mopped"),
        ])
        .await,
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "this role is not permitted");

    Ok(())
}

/// Expect a form without a floor to be rejected
#[tokio::test]
async fn requires_floor() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = create_work(
        State(offline_state(&test)),
        auth_user(2, ROLE_ID_STAFF),
        multipart(&[("task_id", "1"), ("task_type_id", "1"), ("info", "Lobby")]).await,
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "floor is required");

    Ok(())
}

/// Expect only the owner to update a work entry
#[tokio::test]
async fn refuses_foreign_update() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let staff = test.user().insert_user("NID2002", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    let work = test
        .work()
        .insert_work(staff.id, TASK_ID_DAILY, task_type.id, "1")
        .await?;

    let response = update_work(
        State(offline_state(&test)),
        auth_user(staff.id + 1, ROLE_ID_STAFF),
        Path(work.id),
        multipart(&[("floor", "2")]).await,
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "this role is not permitted");

    Ok(())
}

/// Expect the owner to delete their work entry
#[tokio::test]
async fn owner_deletes_work() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let staff = test.user().insert_user("NID2003", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    let work = test
        .work()
        .insert_work(staff.id, TASK_ID_DAILY, task_type.id, "1")
        .await?;

    let response = delete_work(
        State(offline_state(&test)),
        auth_user(staff.id, ROLE_ID_STAFF),
        Path(work.id),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["message"], "success delete!");

    Ok(())
}

/// Expect the admin dashboard to require a task
#[tokio::test]
async fn admin_dashboard_requires_task() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = dashboard_admin(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery::default()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "task_id is required");

    Ok(())
}

/// Expect daily work to be counted per floor
#[tokio::test]
async fn admin_dashboard_counts_floors() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let staff = test.user().insert_user("NID2004", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    for floor in ["1", "1", "2"] {
        test.work()
            .insert_work(staff.id, TASK_ID_DAILY, task_type.id, floor)
            .await?;
    }

    let response = dashboard_admin(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            task_id: Some(TASK_ID_DAILY),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["floor"], "1");
    assert_eq!(body["data"][0]["count"], 2);
    assert_eq!(body["data"][1]["count"], 1);

    Ok(())
}

/// Expect the staff dashboard to count every staff member's work on the task
#[tokio::test]
async fn staff_dashboard_counts_task_work() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let staff = test.user().insert_user("NID2005", ROLE_ID_STAFF).await?;
    let other = test.user().insert_user("NID2006", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    test.work()
        .insert_work(staff.id, TASK_ID_DAILY, task_type.id, "1")
        .await?;
    test.work()
        .insert_work(other.id, TASK_ID_DAILY, task_type.id, "1")
        .await?;

    let response = dashboard_staff(
        State(offline_state(&test)),
        auth_user(staff.id, ROLE_ID_STAFF),
        Query(ListQuery {
            task_id: Some(TASK_ID_DAILY),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["name"], "Mopping");
    assert_eq!(body["data"][0]["count"], 2);

    Ok(())
}

/// Expect the staff dashboard to need a task
#[tokio::test]
async fn staff_dashboard_requires_task() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = dashboard_staff(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_STAFF),
        Query(ListQuery::default()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "task_id is required");

    Ok(())
}

/// Expect the export file to be named after the first day of the filter
#[tokio::test]
async fn names_export_after_filter_start() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = export_works(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            format: Some("excel".to_string()),
            created_at: Some("2025-01-02_2025-01-31".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=(20250102) CleanCare - Laporan Pekerjaan Petugas Kebersihan.xlsx"
    );

    Ok(())
}

/// Expect a PDF attachment named like the spreadsheet
#[tokio::test]
async fn exports_pdf_report() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = export_works(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            format: Some("pdf".to_string()),
            created_at: Some("2025-01-02_2025-01-31".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=(20250102) CleanCare - Laporan Pekerjaan Petugas Kebersihan.pdf"
    );

    Ok(())
}

/// Expect formats other than excel and pdf to be rejected
#[tokio::test]
async fn rejects_unknown_export_format() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;

    let response = export_works(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            format: Some("csv".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "format csv is not supported");

    Ok(())
}
