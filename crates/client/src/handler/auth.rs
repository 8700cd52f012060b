use crate::{
    handler::error_reply,
    middleware::{
        session::{self, TOKEN_COOKIE},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{
            ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
            VerifyOtpRequest,
        },
        response::{
            ApiResponse,
            auth::{MessageResponse, SessionResponse},
        },
    },
    model::UserProfile,
    service::SessionContext,
};
use std::sync::Arc;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "LessPay gateway is up";

    let json_response = serde_json::json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

/// Loads the profile behind a freshly issued token, records the session and
/// hands the token back as an http-only cookie.
async fn start_session(
    data: &AppState,
    jar: CookieJar,
    token: String,
    message: String,
) -> Result<(CookieJar, Json<Value>), (StatusCode, Json<Value>)> {
    let profile = data
        .di_container
        .profile_service
        .get_profile(&token)
        .await
        .map_err(error_reply)?;

    let context = data.sessions.establish(&token, profile.data).await;

    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let response = ApiResponse::success(
        message,
        SessionResponse {
            token,
            user: context.profile,
        },
    );

    Ok((jar.add(cookie), Json(json!(response))))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Sign up accepted, OTP sent", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn register_user_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.register_user(&body).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn login_user_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let response = data
        .di_container
        .auth_service
        .login_user(&body)
        .await
        .map_err(error_reply)?;

    start_session(&data, jar, response.data, response.message).await
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP verified", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Invalid or expired OTP")
    ),
    tag = "Auth"
)]
pub async fn verify_otp_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<VerifyOtpRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let response = data
        .di_container
        .auth_service
        .verify_otp(&body)
        .await
        .map_err(error_reply)?;

    start_session(&data, jar, response.data, response.message).await
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset OTP sent", body = ApiResponse<MessageResponse>)
    ),
    tag = "Auth"
)]
pub async fn forgot_password_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.forgot_password(&body).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Invalid or expired OTP")
    ),
    tag = "Auth"
)]
pub async fn reset_password_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.reset_password(&body).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth",
)]
pub async fn get_me_handler(
    Extension(context): Extension<SessionContext>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let response = ApiResponse::success("Profile retrieved", context.profile);

    Ok((StatusCode::OK, Json(json!(response))))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth",
)]
pub async fn logout_handler(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    data.sessions.end(&context.token).await;
    info!("User {} logged out", context.user_id());

    let response = ApiResponse::success(
        "Logged out",
        MessageResponse {
            message: "Session ended".to_string(),
        },
    );

    let jar = jar.remove(Cookie::build((TOKEN_COOKIE, "")).path("/"));

    Ok((jar, Json(json!(response))))
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/auth/register", post(register_user_handler))
        .route("/api/auth/login", post(login_user_handler))
        .route("/api/auth/verify-otp", post(verify_otp_handler))
        .route("/api/auth/forgot-password", post(forgot_password_handler))
        .route("/api/auth/reset-password", post(reset_password_handler))
        .route("/api/healthchecker", get(health_checker_handler));

    let private_routes = OpenApiRouter::new()
        .route("/api/auth/me", get(get_me_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::session,
        ));

    public_routes.merge(private_routes).with_state(app_state)
}
