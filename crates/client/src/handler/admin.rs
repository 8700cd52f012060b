use crate::{handler::error_reply, middleware::session, state::AppState};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use shared::{
    domain::{request::FindAllUserRequest, response::ApiResponse},
    model::UserProfile,
    service::{SessionContext, TransactionView},
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    ),
    params(FindAllUserRequest),
    responses(
        (status = 200, description = "Users whose email contains the search text", body = ApiResponse<Vec<UserProfile>>),
        (status = 401, description = "Unauthorized access"),
        (status = 403, description = "Not an administrator"),
    )
)]
pub async fn get_users(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    Query(params): Query<FindAllUserRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .user_service
        .get_users(&context.token, &params)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/transactions",
    tag = "Admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's transactions with status, settlement date and link expiry", body = ApiResponse<Vec<TransactionView>>),
        (status = 401, description = "Unauthorized access"),
        (status = 403, description = "Not an administrator"),
    )
)]
pub async fn get_user_transactions(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let response = data
        .di_container
        .payment_service
        .get_user_transactions(&context.token, &id)
        .await
        .map_err(error_reply)?;

    let views = data.di_container.history.build(response.data).await;
    let response = ApiResponse::success(response.message, views);

    Ok((StatusCode::OK, Json(json!(response))))
}

pub fn admin_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/admin/users", get(get_users))
        .route("/api/admin/users/{id}/transactions", get(get_user_transactions))
        .route_layer(middleware::from_fn(session::admin))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::session,
        ))
        .with_state(app_state)
}
