use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use reqwest::Method as HttpMethod;
use serde::Deserialize;
use serde_json::json;
use shared::{
    abstract_trait::PaymentStatusLookupTrait,
    model::PaymentStatus,
    utils::{AppError, Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use super::{BackendClient, ServiceTracer};

#[derive(Debug, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    status: String,
}

/// Gateway status lookup through the backend's `/api/payment-status`.
#[derive(Debug)]
pub struct HttpStatusLookup {
    client: BackendClient,
    tracer: ServiceTracer,
}

impl HttpStatusLookup {
    pub async fn new(
        client: BackendClient,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        let tracer =
            ServiceTracer::new("payment-status-client", "payment_status", metrics, registry)
                .await;

        Self { client, tracer }
    }
}

#[async_trait]
impl PaymentStatusLookupTrait for HttpStatusLookup {
    async fn lookup_status(&self, reference: &str) -> Result<PaymentStatus, AppError> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "LookupPaymentStatus",
            vec![
                KeyValue::new("component", "payment_status"),
                KeyValue::new("payment.reference", reference.to_string()),
            ],
        );

        let result: Result<StatusPayload, AppError> = self
            .client
            .send(
                &tracing_ctx.cx,
                HttpMethod::POST,
                "/api/payment-status",
                None,
                &json!({ "paymentTransactionId": reference }),
            )
            .await;

        match result {
            Ok(payload) => {
                let status = PaymentStatus::from_gateway(&payload.status);

                self.tracer
                    .complete_tracing_success(
                        &tracing_ctx,
                        method,
                        &format!("Payment {reference} is {status}"),
                    )
                    .await;

                Ok(status)
            }
            Err(err) => {
                warn!("Status lookup for {reference} failed: {err}");

                self.tracer
                    .complete_tracing_error(
                        &tracing_ctx,
                        method,
                        &format!("Status lookup for {reference} failed: {err}"),
                    )
                    .await;

                Err(err)
            }
        }
    }
}
