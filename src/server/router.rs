//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every endpoint is registered here together with its OpenAPI specification, and Swagger UI is
//! served at `/api/docs` with the document at `/api/docs/openapi.json`.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Request body limit, sized for a form carrying two phone photos
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Registers the `bearer` scheme referenced by the protected endpoints
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Returns
/// An Axum `Router<AppState>` ready to be given its state.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "CleanCare", description = "CleanCare back-office API"),
        modifiers(&BearerSecurity),
        tags(
            (name = controller::home::HOME_TAG, description = "Service greeting"),
            (name = controller::auth::AUTH_TAG, description = "Login sessions, registration and password recovery"),
            (name = controller::role::ROLE_TAG, description = "User roles"),
            (name = controller::task::TASK_TAG, description = "Tasks and task types"),
            (name = controller::user::USER_TAG, description = "User management"),
            (name = controller::work::WORK_TAG, description = "Work entries and dashboards"),
            (name = controller::comment::COMMENT_TAG, description = "Comments on work entries"),
            (name = controller::websocket::WEBSOCKET_TAG, description = "Unread comment notifications"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::home::home))
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::refresh_token))
        .routes(routes!(controller::auth::forgot_password))
        .routes(routes!(controller::auth::validate_reset_password))
        .routes(routes!(controller::auth::verify_number))
        .routes(routes!(controller::auth::register))
        .routes(routes!(controller::role::list_roles))
        .routes(routes!(controller::role::export_roles))
        .routes(routes!(controller::task::list_tasks))
        .routes(routes!(
            controller::task::list_task_types,
            controller::task::create_task_type
        ))
        .routes(routes!(
            controller::task::update_task_type,
            controller::task::delete_task_type
        ))
        .routes(routes!(
            controller::user::create_user,
            controller::user::list_users
        ))
        .routes(routes!(controller::user::user_info))
        .routes(routes!(controller::user::export_users))
        .routes(routes!(
            controller::user::get_user,
            controller::user::update_user,
            controller::user::delete_user
        ))
        .routes(routes!(controller::user::change_password))
        .routes(routes!(controller::user::reset_password))
        .routes(routes!(
            controller::work::create_work,
            controller::work::list_works
        ))
        .routes(routes!(controller::work::export_works))
        .routes(routes!(controller::work::dashboard_admin))
        .routes(routes!(controller::work::dashboard_staff))
        .route(
            "/api/work/dashboard-staff",
            get(controller::work::dashboard_staff),
        )
        .routes(routes!(
            controller::work::get_work,
            controller::work::update_work,
            controller::work::delete_work
        ))
        .routes(routes!(controller::comment::create_comment))
        .routes(routes!(
            controller::comment::list_comments,
            controller::comment::update_comment,
            controller::comment::delete_comment
        ))
        .routes(routes!(controller::websocket::websocket))
        .split_for_parts();

    routes
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
