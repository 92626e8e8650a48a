use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use cleancare::server::{
    controller::role::{export_roles, list_roles},
    model::query::ListQuery,
    service::export::XLSX_CONTENT_TYPE,
};
use cleancare_test_utils::prelude::*;

use super::*;

/// Expect admins to see both seeded roles
#[tokio::test]
async fn lists_roles_for_admin() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;

    let response = list_roles(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery::default()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["data"][0]["name"], "Admin");

    Ok(())
}

/// Expect staff to be refused with 400
#[tokio::test]
async fn refuses_staff() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;

    let response = list_roles(
        State(offline_state(&test)),
        auth_user(2, ROLE_ID_STAFF),
        Query(ListQuery::default()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "this role is not permitted");

    Ok(())
}

/// Expect the export to be a spreadsheet attachment
#[tokio::test]
async fn exports_spreadsheet() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;

    let response = export_roles(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            format: Some("excel".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment; filename="));

    Ok(())
}

/// Expect any format other than excel to be rejected
#[tokio::test]
async fn rejects_pdf_export() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;

    let response = export_roles(
        State(offline_state(&test)),
        auth_user(1, ROLE_ID_ADMIN),
        Query(ListQuery {
            format: Some("pdf".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
