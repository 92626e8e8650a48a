use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse},
    Json,
};

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, MessageDto},
        auth::{
            ForgotPasswordDto, LoginDto, LoginResponseDto, RegisterFormDto, TokenDto,
            VerifyNumberDto,
        },
        user::UserDto,
    },
    server::{
        controller::{
            extract::{ClientIp, ExpiredAuthUser},
            form::FormFields,
            response::{message, ok},
        },
        error::Error,
        model::{app::AppState, form::RegisterForm},
        service::auth::AuthService,
        util::template::render,
    },
};

pub static AUTH_TAG: &str = "auth";

const RESET_SUCCESS_PAGE: &str =
    include_str!("../../../templates/webview/reset_password_success.html");
const RESET_FAILED_PAGE: &str =
    include_str!("../../../templates/webview/reset_password_failed.html");

/// Signs in with a number id and password
///
/// # Responses
/// - 200: token and profile of the user
/// - 401: unknown number id, unregistered user or wrong password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Number id or password is incorrect", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    let response = AuthService::new(&state).login(payload).await?;

    Ok(ok(response))
}

/// Ends the login session of the token, which may already be expired
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<MessageDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    ExpiredAuthUser(auth): ExpiredAuthUser,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state).logout(&auth).await?;

    Ok(message("success logout!"))
}

/// Issues a new token for the same login session
///
/// # Responses
/// - 200: the new token
/// - 422: the login was revoked or refreshed too many times
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    tag = AUTH_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<TokenDto>),
        (status = 401, description = "Missing or invalid token", body = ErrorDto),
        (status = 422, description = "Login has to sign in again", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ExpiredAuthUser(auth): ExpiredAuthUser,
) -> Result<impl IntoResponse, Error> {
    let token = AuthService::new(&state).refresh(&auth).await?;

    Ok(ok(TokenDto { token }))
}

/// Emails a password reset link
#[utoipa::path(
    post,
    path = "/api/auth/send-email/forgot-password",
    tag = AUTH_TAG,
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Email sent", body = ApiResponse<MessageDto>),
        (status = 400, description = "Too many attempts", body = ErrorDto),
        (status = 401, description = "Email not found", body = ErrorDto),
        (status = 502, description = "Email could not be delivered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state)
        .forgot_password(&ip, payload.email.trim())
        .await?;

    Ok(message("success send email forgot password!"))
}

/// Target of the emailed reset link; answers with a page for the browser
#[utoipa::path(
    get,
    path = "/api/auth/validation/reset-password/{token}",
    tag = AUTH_TAG,
    params(("token" = String, Path, description = "Reset token from the email")),
    responses(
        (status = 200, description = "Page describing the outcome", body = String, content_type = "text/html"),
    ),
)]
pub async fn validate_reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    match AuthService::new(&state).validate_reset_password(&token).await {
        Ok(email) => Html(render(RESET_SUCCESS_PAGE, &[("Data", &email)])),
        Err(e) => {
            tracing::debug!("Reset password validation failed: {}", e);

            Html(render(RESET_FAILED_PAGE, &[("Error", &e.to_string())]))
        }
    }
}

/// Looks up an account that has yet to be registered
#[utoipa::path(
    post,
    path = "/api/auth/verify-number",
    tag = AUTH_TAG,
    request_body = VerifyNumberDto,
    responses(
        (status = 200, description = "The unregistered user", body = ApiResponse<UserDto>),
        (status = 400, description = "Too many attempts", body = ErrorDto),
        (status = 401, description = "Wrong number id or already registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify_number(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<VerifyNumberDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state)
        .verify_number(&ip, payload.number_id.trim())
        .await?;

    Ok(ok(user))
}

/// Completes an account with an email, a password and an optional profile picture
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body(content = RegisterFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Registered", body = ApiResponse<MessageDto>),
        (status = 400, description = "Invalid form or email already used", body = ErrorDto),
        (status = 401, description = "Unknown or already registered user", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let form = RegisterForm::try_from(FormFields::read(multipart).await?)?;

    AuthService::new(&state).register(&ip, form).await?;

    Ok(message("success register!"))
}
