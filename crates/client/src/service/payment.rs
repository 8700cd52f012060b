use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use reqwest::Method as HttpMethod;
use serde::{Deserialize, Serialize};
use shared::{
    abstract_trait::PaymentServiceTrait,
    domain::{
        request::CreatePaymentRequest,
        response::{ApiResponse, ErrorResponse, payment::PaymentLinkResponse},
    },
    model::Transaction,
    service::FeeBreakdown,
    utils::{AppError, Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use super::{BackendClient, ServiceTracer};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePaymentLink<'a> {
    amount: String,
    receive_amount: String,
    #[serde(rename = "mobileno")]
    mobile_number: &'a str,
    #[serde(rename = "email_id")]
    email: &'a str,
    #[serde(rename = "invoice_id")]
    invoice_id: &'a str,
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PaymentLinkPayload {
    #[serde(default)]
    smslink: Option<String>,
}

#[derive(Debug)]
pub struct PaymentService {
    client: BackendClient,
    tracer: ServiceTracer,
}

impl PaymentService {
    pub async fn new(
        client: BackendClient,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        let tracer =
            ServiceTracer::new("payment-service-client", "payment", metrics, registry).await;

        Self { client, tracer }
    }
}

#[async_trait]
impl PaymentServiceTrait for PaymentService {
    async fn generate_payment_link(
        &self,
        token: &str,
        user_id: &str,
        breakdown: &FeeBreakdown,
        input: &CreatePaymentRequest,
    ) -> Result<ApiResponse<PaymentLinkResponse>, ErrorResponse> {
        let method = Method::Post;
        let invoice_id = Uuid::new_v4().simple().to_string();

        info!(
            "Generating payment link for user {user_id}: amount {}, receive {}",
            breakdown.amount, breakdown.receive_amount
        );

        let tracing_ctx = self.tracer.start_tracing(
            "GeneratePaymentLink",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("operation", "generate_link"),
                KeyValue::new("user.id", user_id.to_string()),
                KeyValue::new("invoice.id", invoice_id.clone()),
                KeyValue::new("amount", breakdown.amount.to_string()),
            ],
        );

        let body = GeneratePaymentLink {
            amount: breakdown.amount.to_string(),
            receive_amount: breakdown.receive_amount.to_string(),
            mobile_number: &input.mobile_number,
            email: &input.email,
            invoice_id: &invoice_id,
            id: user_id,
        };

        let result: Result<PaymentLinkPayload, AppError> = self
            .client
            .send(
                &tracing_ctx.cx,
                HttpMethod::POST,
                "/api/generate-payment-link",
                Some(token),
                &body,
            )
            .await;

        let outcome = result.and_then(|payload| {
            payload
                .smslink
                .filter(|link| !link.is_empty())
                .ok_or_else(|| AppError::InternalError("Invalid response from server".into()))
        });

        match outcome {
            Ok(payment_link) => {
                self.tracer
                    .complete_tracing_success(
                        &tracing_ctx,
                        method,
                        &format!("Payment link generated for invoice {invoice_id}"),
                    )
                    .await;

                Ok(ApiResponse::success(
                    "Payment link generated",
                    PaymentLinkResponse {
                        payment_link,
                        invoice_id,
                        breakdown: breakdown.clone(),
                    },
                ))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!(
                    "Failed to generate payment link for user {user_id}: {}",
                    error_response.message
                );

                self.tracer
                    .complete_tracing_error(
                        &tracing_ctx,
                        method,
                        &format!(
                            "Failed to generate payment link for user {user_id}: {}",
                            error_response.message
                        ),
                    )
                    .await;

                Err(error_response)
            }
        }
    }

    async fn get_user_transactions(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<ApiResponse<Vec<Transaction>>, ErrorResponse> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "GetUserTransactions",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("operation", "list_transactions"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        let result: Result<Vec<Transaction>, AppError> = self
            .client
            .get_segments(
                &tracing_ctx.cx,
                &["profile", "user-transactions", user_id],
                Some(token),
            )
            .await;

        match result {
            Ok(transactions) => {
                let message = format!(
                    "Retrieved {} transactions for user {user_id}",
                    transactions.len()
                );

                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, &message)
                    .await;

                Ok(ApiResponse::success(message, transactions))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!(
                    "Failed to fetch transactions for user {user_id}: {}",
                    error_response.message
                );

                self.tracer
                    .complete_tracing_error(
                        &tracing_ctx,
                        method,
                        &format!(
                            "Failed to fetch transactions for user {user_id}: {}",
                            error_response.message
                        ),
                    )
                    .await;

                Err(error_response)
            }
        }
    }
}
