use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use reqwest::Method as HttpMethod;
use serde_json::json;
use shared::{
    abstract_trait::ProfileServiceTrait,
    domain::{
        request::{UpdateBankDetailsRequest, UpdatePasswordRequest, UpdatePersonalInfoRequest},
        response::{ApiResponse, ErrorResponse, auth::MessageResponse},
    },
    model::UserProfile,
    utils::{AppError, Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use super::{BackendClient, ServiceTracer};

const UPDATE_PROFILE_PATH: &str = "/api/update-profile";

#[derive(Debug)]
pub struct ProfileService {
    client: BackendClient,
    tracer: ServiceTracer,
}

impl ProfileService {
    pub async fn new(
        client: BackendClient,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        let tracer =
            ServiceTracer::new("profile-service-client", "profile", metrics, registry).await;

        Self { client, tracer }
    }

    /// All three profile edits share one backend endpoint.
    async fn update_profile(
        &self,
        token: &str,
        operation: &'static str,
        body: serde_json::Value,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let method = Method::Put;
        let tracing_ctx = self.tracer.start_tracing(
            operation,
            vec![
                KeyValue::new("component", "profile"),
                KeyValue::new("operation", operation),
            ],
        );

        let result: Result<MessageResponse, AppError> = self
            .client
            .send(
                &tracing_ctx.cx,
                HttpMethod::PUT,
                UPDATE_PROFILE_PATH,
                Some(token),
                &body,
            )
            .await;

        match result {
            Ok(ack) => {
                let message = if ack.message.is_empty() {
                    "Profile updated successfully".to_string()
                } else {
                    ack.message.clone()
                };

                info!("{operation}: {message}");

                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, &message)
                    .await;

                Ok(ApiResponse::success(message, ack))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!("{operation} failed: {}", error_response.message);

                self.tracer
                    .complete_tracing_error(
                        &tracing_ctx,
                        method,
                        &format!("{operation} failed: {}", error_response.message),
                    )
                    .await;

                Err(error_response)
            }
        }
    }
}

#[async_trait]
impl ProfileServiceTrait for ProfileService {
    async fn get_profile(&self, token: &str) -> Result<ApiResponse<UserProfile>, ErrorResponse> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "GetProfile",
            vec![
                KeyValue::new("component", "profile"),
                KeyValue::new("operation", "get"),
            ],
        );

        let result: Result<UserProfile, AppError> =
            self.client.get(&tracing_ctx.cx, "/profile", Some(token)).await;

        match result {
            Ok(profile) => {
                self.tracer
                    .complete_tracing_success(
                        &tracing_ctx,
                        method,
                        &format!("Retrieved profile {}", profile.id),
                    )
                    .await;

                Ok(ApiResponse::success("Profile retrieved", profile))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!("Failed to fetch profile: {}", error_response.message);

                self.tracer
                    .complete_tracing_error(
                        &tracing_ctx,
                        method,
                        &format!("Failed to fetch profile: {}", error_response.message),
                    )
                    .await;

                Err(error_response)
            }
        }
    }

    async fn update_personal_info(
        &self,
        token: &str,
        input: &UpdatePersonalInfoRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let body = json!({ "fullName": input.full_name, "email": input.email });

        self.update_profile(token, "UpdatePersonalInfo", body).await
    }

    async fn update_password(
        &self,
        token: &str,
        input: &UpdatePasswordRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let body = json!({
            "oldPassword": input.old_password,
            "newPassword": input.new_password,
        });

        self.update_profile(token, "UpdatePassword", body).await
    }

    async fn update_bank_details(
        &self,
        token: &str,
        input: &UpdateBankDetailsRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let body = json!({
            "accountHolder": input.account_holder,
            "accountNumber": input.account_number,
            "ifscCode": input.ifsc_code,
            "bankName": input.bank_name,
        });

        self.update_profile(token, "UpdateBankDetails", body).await
    }
}
