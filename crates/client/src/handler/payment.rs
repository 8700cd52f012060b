use crate::{
    handler::error_reply,
    middleware::{session, validate::SimpleValidatedJson},
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
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{CreatePaymentRequest, FeeQuoteRequest, PaymentStatusRequest},
        response::{
            ApiResponse, ErrorResponse,
            payment::{PaymentLinkResponse, PaymentStatusResponse},
        },
    },
    model::PaymentStatus,
    service::{FeeBreakdown, SessionContext, TransactionView},
};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/fees/quote",
    request_body = FeeQuoteRequest,
    responses(
        (status = 200, description = "Fee breakdown for the amount", body = ApiResponse<FeeBreakdown>),
        (status = 400, description = "Invalid or below-minimum amount", body = ErrorResponse)
    ),
    tag = "Payment"
)]
pub async fn quote_fee_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<FeeQuoteRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.fee_calculator.quote_str(&body.amount) {
        Ok(breakdown) => {
            let response = ApiResponse::success("Fee quote calculated", breakdown);
            Ok((StatusCode::OK, Json(json!(response))))
        }
        Err(e) => Err(error_reply(ErrorResponse::from(e))),
    }
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Payment link generated", body = ApiResponse<PaymentLinkResponse>),
        (status = 400, description = "Invalid amount or payer details", body = ErrorResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payment"
)]
pub async fn create_payment_handler(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreatePaymentRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let breakdown = data
        .di_container
        .fee_calculator
        .quote_str(&body.amount)
        .map_err(|e| error_reply(ErrorResponse::from(e)))?;

    match data
        .di_container
        .payment_service
        .generate_payment_link(&context.token, context.user_id(), &breakdown, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err(error_reply(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Transactions, newest first, with live status", body = ApiResponse<Vec<TransactionView>>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payment"
)]
pub async fn get_transactions_handler(
    State(data): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let response = data
        .di_container
        .payment_service
        .get_user_transactions(&context.token, context.user_id())
        .await
        .map_err(error_reply)?;

    let views = data.di_container.history.build(response.data).await;
    let response = ApiResponse::success(response.message, views);

    Ok((StatusCode::OK, Json(json!(response))))
}

#[utoipa::path(
    post,
    path = "/api/payment-status",
    request_body = PaymentStatusRequest,
    responses(
        (status = 200, description = "Normalized gateway status", body = ApiResponse<PaymentStatusResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payment"
)]
pub async fn payment_status_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<PaymentStatusRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let reference = body.payment_transaction_id.trim();

    let status = match data.di_container.status_lookup.lookup_status(reference).await {
        Ok(status) => status,
        Err(e) => {
            warn!("Reporting {reference} as failed: {e}");
            PaymentStatus::Failed
        }
    };

    info!("Payment {reference} status: {status}");

    let response = ApiResponse::success(
        "Payment status retrieved",
        PaymentStatusResponse {
            payment_transaction_id: reference.to_string(),
            status,
        },
    );

    Ok((StatusCode::OK, Json(json!(response))))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new().route("/api/fees/quote", post(quote_fee_handler));

    let private_routes = OpenApiRouter::new()
        .route("/api/payments", post(create_payment_handler))
        .route("/api/transactions", get(get_transactions_handler))
        .route("/api/payment-status", post(payment_status_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::session,
        ));

    public_routes.merge(private_routes).with_state(app_state)
}
