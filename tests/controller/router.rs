use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use cleancare::server::router::routes;
use cleancare_test_utils::prelude::*;
use tower::ServiceExt;

use super::*;
use crate::util::body_text;

/// Expect the root path to greet with the application name and version
#[tokio::test]
async fn greets_on_root() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let app = routes().with_state(offline_state(&test));

    let request = Request::builder()
        .uri("/")
        .body(Body::empty())
        .expect("valid request");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "Hello there, welcome to app CleanCare version 1.0.0."
    );

    Ok(())
}

/// Expect protected routes to answer 401 without a bearer token
#[tokio::test]
async fn rejects_request_without_token() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let app = routes().with_state(offline_state(&test));

    let request = Request::builder()
        .uri("/api/role")
        .body(Body::empty())
        .expect("valid request");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid_token");

    Ok(())
}

/// Expect a token signed with another secret to be rejected
#[tokio::test]
async fn rejects_foreign_token() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let app = routes().with_state(offline_state(&test));

    let request = Request::builder()
        .uri("/api/user/info")
        .header("Authorization", "Bearer not.a.token")
        .body(Body::empty())
        .expect("valid request");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect the OpenAPI document to describe the comment routes
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;
    let app = routes().with_state(offline_state(&test));

    let request = Request::builder()
        .uri("/api/docs/openapi.json")
        .body(Body::empty())
        .expect("valid request");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/work/comment/{id}"].is_object());
    assert!(body["paths"]["/api/auth/login"]["post"].is_object());
    assert!(body["paths"]["/api/user/change-password/{id}"]["patch"].is_object());
    assert!(body["paths"]["/api/user/reset-password/{id}"]["patch"].is_object());
    assert!(body["paths"]["/api/work/dashboard-staf"]["get"].is_object());

    Ok(())
}

/// Expect both spellings of the staff dashboard path to be routed
#[tokio::test]
async fn routes_both_staff_dashboard_paths() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;

    for uri in ["/api/work/dashboard-staf", "/api/work/dashboard-staff"] {
        let app = routes().with_state(offline_state(&test));
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    Ok(())
}

/// Expect password changes to be routed as PATCH only
#[tokio::test]
async fn routes_password_changes_as_patch() -> Result<(), TestError> {
    let test = test_setup_with_tables!()?;

    for (method, status) in [
        ("PATCH", StatusCode::UNAUTHORIZED),
        ("PUT", StatusCode::METHOD_NOT_ALLOWED),
    ] {
        let app = routes().with_state(offline_state(&test));
        let request = Request::builder()
            .method(method)
            .uri("/api/user/change-password/1")
            .body(Body::empty())
            .expect("valid request");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), status, "{}", method);
    }

    Ok(())
}

/// Expect a registration carrying a photo larger than the framework default to be read in full
#[tokio::test]
async fn reads_photo_above_default_body_limit() -> Result<(), TestError> {
    let test = test_setup_with_user_tables!()?;
    let app = routes().with_state(offline_state(&test));

    let boundary = "cleancare-photo-boundary";
    let mut body = Vec::new();
    for (name, value) in [("number_id", "NID7001"), ("email", "photo@example.com")] {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"profile\"; filename=\"me.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n",
            boundary
        )
        .as_bytes(),
    );
    body.extend(std::iter::repeat(0xAB_u8).take(3 * 1024 * 1024));
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("valid request");
    let response = app.oneshot(request).await.unwrap();

    // The body was read completely, so the form check for the missing password answers
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "password is required");

    Ok(())
}
