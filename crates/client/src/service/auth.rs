use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use reqwest::Method as HttpMethod;
use serde::Deserialize;
use serde_json::json;
use shared::{
    abstract_trait::AuthServiceTrait,
    domain::{
        request::{
            ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
            VerifyOtpRequest,
        },
        response::{ApiResponse, ErrorResponse, auth::MessageResponse},
    },
    utils::{AppError, Method, Metrics, TracingContext},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use super::{BackendClient, ServiceTracer};

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub struct AuthService {
    client: BackendClient,
    tracer: ServiceTracer,
}

impl AuthService {
    pub async fn new(
        client: BackendClient,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        let tracer = ServiceTracer::new("auth-service-client", "auth", metrics, registry).await;

        Self { client, tracer }
    }

    async fn acknowledge(
        &self,
        tracing_ctx: &TracingContext,
        path: &str,
        body: serde_json::Value,
        what: &str,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let result: Result<MessageResponse, AppError> = self
            .client
            .send(&tracing_ctx.cx, HttpMethod::POST, path, None, &body)
            .await;

        match result {
            Ok(ack) => {
                let message = if ack.message.is_empty() {
                    format!("{what} succeeded")
                } else {
                    ack.message.clone()
                };

                self.tracer
                    .complete_tracing_success(tracing_ctx, Method::Post, &message)
                    .await;

                Ok(ApiResponse::success(message, ack))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!("{what} failed: {}", error_response.message);

                self.tracer
                    .complete_tracing_error(
                        tracing_ctx,
                        Method::Post,
                        &format!("{what} failed: {}", error_response.message),
                    )
                    .await;

                Err(error_response)
            }
        }
    }

    async fn obtain_token(
        &self,
        tracing_ctx: &TracingContext,
        path: &str,
        body: serde_json::Value,
        email: &str,
    ) -> Result<ApiResponse<String>, ErrorResponse> {
        let result: Result<TokenPayload, AppError> = self
            .client
            .send(&tracing_ctx.cx, HttpMethod::POST, path, None, &body)
            .await;

        let outcome = result.and_then(|payload| {
            payload
                .token
                .filter(|t| !t.is_empty())
                .map(|token| (token, payload.message))
                .ok_or_else(|| AppError::InternalError("Token not received from server".into()))
        });

        match outcome {
            Ok((token, message)) => {
                info!("User {email} authenticated");

                self.tracer
                    .complete_tracing_success(
                        tracing_ctx,
                        Method::Post,
                        &format!("User {email} authenticated"),
                    )
                    .await;

                Ok(ApiResponse::success(
                    message.unwrap_or_else(|| "Login successful".to_string()),
                    token,
                ))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!("Failed to authenticate {email}: {}", error_response.message);

                self.tracer
                    .complete_tracing_error(
                        tracing_ctx,
                        Method::Post,
                        &format!("Failed to authenticate {email}: {}", error_response.message),
                    )
                    .await;

                Err(error_response)
            }
        }
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register_user(
        &self,
        input: &RegisterRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        info!("Registering user: {}", input.email);

        let tracing_ctx = self.tracer.start_tracing(
            "RegisterUser",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "register"),
                KeyValue::new("user.email", input.email.clone()),
            ],
        );

        let body = json!({ "email": input.email, "password": input.password });

        self.acknowledge(&tracing_ctx, "/auth/signup", body, "Sign up")
            .await
    }

    async fn login_user(&self, input: &LoginRequest) -> Result<ApiResponse<String>, ErrorResponse> {
        info!("Logging in user: {}", input.email);

        let tracing_ctx = self.tracer.start_tracing(
            "LoginUser",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "login"),
                KeyValue::new("user.email", input.email.clone()),
            ],
        );

        let body = json!({ "email": input.email, "password": input.password });

        self.obtain_token(&tracing_ctx, "/auth/login", body, &input.email)
            .await
    }

    async fn verify_otp(
        &self,
        input: &VerifyOtpRequest,
    ) -> Result<ApiResponse<String>, ErrorResponse> {
        info!("Verifying OTP for: {}", input.email);

        let tracing_ctx = self.tracer.start_tracing(
            "VerifyOtp",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "verify_otp"),
                KeyValue::new("user.email", input.email.clone()),
            ],
        );

        let body = json!({ "email": input.email, "otp": input.otp });

        self.obtain_token(&tracing_ctx, "/auth/verify-otp", body, &input.email)
            .await
    }

    async fn forgot_password(
        &self,
        input: &ForgotPasswordRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "ForgotPassword",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "forgot_password"),
                KeyValue::new("user.email", input.email.clone()),
            ],
        );

        let body = json!({ "email": input.email });

        self.acknowledge(&tracing_ctx, "/auth/forgot-password", body, "OTP request")
            .await
    }

    async fn reset_password(
        &self,
        input: &ResetPasswordRequest,
    ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "ResetPassword",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("operation", "reset_password"),
                KeyValue::new("user.email", input.email.clone()),
            ],
        );

        let body = json!({
            "email": input.email,
            "otp": input.otp,
            "newPassword": input.new_password,
        });

        self.acknowledge(&tracing_ctx, "/auth/reset-password", body, "Password reset")
            .await
    }
}
