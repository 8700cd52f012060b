use crate::{
    handler::error_reply,
    middleware::{session, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Extension, Json, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::put,
};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{UpdateBankDetailsRequest, UpdatePasswordRequest, UpdatePersonalInfoRequest},
        response::{ApiResponse, auth::MessageResponse},
    },
    service::SessionContext,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    put,
    path = "/api/profile/personal",
    request_body = UpdatePersonalInfoRequest,
    responses(
        (status = 200, description = "Personal info updated", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_personal_info_handler(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdatePersonalInfoRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .profile_service
        .update_personal_info(&context.token, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/profile/password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Old password rejected"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_password_handler(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .profile_service
        .update_password(&context.token, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/profile/bank",
    request_body = UpdateBankDetailsRequest,
    responses(
        (status = 200, description = "Bank details saved", body = ApiResponse<MessageResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_bank_details_handler(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateBankDetailsRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .profile_service
        .update_bank_details(&context.token, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

pub fn profile_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/profile/personal", put(update_personal_info_handler))
        .route("/api/profile/password", put(update_password_handler))
        .route("/api/profile/bank", put(update_bank_details_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::session,
        ))
        .with_state(app_state)
}
