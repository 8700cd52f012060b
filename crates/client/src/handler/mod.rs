mod admin;
mod auth;
mod payment;
mod profile;

use crate::state::AppState;
use anyhow::Result;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use prometheus_client::encoding::text::encode;
use serde_json::{Value, json};
use shared::domain::response::ErrorResponse;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::openapi::security::SecurityScheme;
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::admin::admin_routes;
pub use self::auth::auth_routes;
pub use self::payment::payment_routes;
pub use self::profile::profile_routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_user_handler,
        auth::login_user_handler,
        auth::verify_otp_handler,
        auth::forgot_password_handler,
        auth::reset_password_handler,
        auth::get_me_handler,
        auth::logout_handler,
        payment::quote_fee_handler,
        payment::create_payment_handler,
        payment::get_transactions_handler,
        payment::payment_status_handler,
        profile::update_personal_info_handler,
        profile::update_password_handler,
        profile::update_bank_details_handler,
        admin::get_users,
        admin::get_user_transactions
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Sign up, login, OTP and password recovery"),
        (name = "Payment", description = "Fee quotes, payment links and transaction status"),
        (name = "Profile", description = "Personal, password and bank account updates"),
        (name = "Admin", description = "Administrative view over users and their transactions")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                )),
            );
        }
    }
}

/// Maps a service failure onto the HTTP status it carries.
pub(crate) fn error_reply(error: ErrorResponse) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(error.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(json!(error)))
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}"),
        );
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}

pub struct AppRouter;

impl AppRouter {
    pub fn router(shared_state: Arc<AppState>) -> Router {
        let mut router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone());

        router = router.merge(auth_routes(shared_state.clone()));
        router = router.merge(payment_routes(shared_state.clone()));
        router = router.merge(profile_routes(shared_state.clone()));
        router = router.merge(admin_routes(shared_state.clone()));

        let router = router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(1024 * 1024))
            .layer(TraceLayer::new_for_http());

        let (router, api) = router.split_for_parts();

        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::router(Arc::new(app_state));

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("Server running on http://{}", listener.local_addr()?);
        info!("Swagger UI: http://localhost:{port}/swagger-ui");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::DependenciesInject;
    use async_trait::async_trait;
    use chrono::FixedOffset;
    use prometheus_client::registry::Registry;
    use reqwest::header::{AUTHORIZATION, SET_COOKIE};
    use rust_decimal_macros::dec;
    use shared::{
        abstract_trait::{
            AuthServiceTrait, PaymentServiceTrait, PaymentStatusLookupTrait, ProfileServiceTrait,
            UserServiceTrait,
        },
        config::FeeConfig,
        domain::{
            request::{
                CreatePaymentRequest, FindAllUserRequest, ForgotPasswordRequest, LoginRequest,
                RegisterRequest, ResetPasswordRequest, UpdateBankDetailsRequest,
                UpdatePasswordRequest, UpdatePersonalInfoRequest, VerifyOtpRequest,
            },
            response::{ApiResponse, auth::MessageResponse, payment::PaymentLinkResponse},
        },
        model::{PaymentStatus, Transaction, UserProfile},
        service::{
            FeeBreakdown, FeeCalculator, SessionStore, SettlementCalendar, StatusReconciler,
            TransactionHistory,
        },
        utils::{AppError, Metrics},
    };
    use std::time::Duration;
    use tokio::sync::Mutex;

    fn profile(id: &str, role: &str) -> UserProfile {
        serde_json::from_value(json!({
            "_id": id,
            "fullName": "Test User",
            "email": format!("{id}@example.com"),
            "userRole": role,
        }))
        .unwrap()
    }

    fn ack() -> ApiResponse<MessageResponse> {
        ApiResponse::success("ok", MessageResponse::default())
    }

    struct FakeAuth;

    #[async_trait]
    impl AuthServiceTrait for FakeAuth {
        async fn register_user(
            &self,
            _input: &RegisterRequest,
        ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
            Ok(ack())
        }

        async fn login_user(
            &self,
            input: &LoginRequest,
        ) -> Result<ApiResponse<String>, ErrorResponse> {
            let token = if input.email.starts_with("admin") {
                "admin-token"
            } else {
                "user-token"
            };
            Ok(ApiResponse::success("Login successful", token.to_string()))
        }

        async fn verify_otp(
            &self,
            _input: &VerifyOtpRequest,
        ) -> Result<ApiResponse<String>, ErrorResponse> {
            Err(ErrorResponse::fail(400, "Invalid OTP"))
        }

        async fn forgot_password(
            &self,
            _input: &ForgotPasswordRequest,
        ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
            Ok(ack())
        }

        async fn reset_password(
            &self,
            _input: &ResetPasswordRequest,
        ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
            Ok(ack())
        }
    }

    struct FakeProfile;

    #[async_trait]
    impl ProfileServiceTrait for FakeProfile {
        async fn get_profile(
            &self,
            token: &str,
        ) -> Result<ApiResponse<UserProfile>, ErrorResponse> {
            match token {
                "admin-token" => Ok(ApiResponse::success("ok", profile("admin", "admin"))),
                "user-token" => Ok(ApiResponse::success("ok", profile("asha", "user"))),
                "outage-token" => Err(ErrorResponse::fail(502, "Backend unavailable")),
                _ => Err(ErrorResponse::fail(401, "Invalid token")),
            }
        }

        async fn update_personal_info(
            &self,
            _token: &str,
            _input: &UpdatePersonalInfoRequest,
        ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
            Ok(ack())
        }

        async fn update_password(
            &self,
            _token: &str,
            _input: &UpdatePasswordRequest,
        ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
            Ok(ack())
        }

        async fn update_bank_details(
            &self,
            _token: &str,
            _input: &UpdateBankDetailsRequest,
        ) -> Result<ApiResponse<MessageResponse>, ErrorResponse> {
            Ok(ack())
        }
    }

    struct FakePayments;

    #[async_trait]
    impl PaymentServiceTrait for FakePayments {
        async fn generate_payment_link(
            &self,
            _token: &str,
            user_id: &str,
            breakdown: &FeeBreakdown,
            _input: &CreatePaymentRequest,
        ) -> Result<ApiResponse<PaymentLinkResponse>, ErrorResponse> {
            Ok(ApiResponse::success(
                "Payment link generated",
                PaymentLinkResponse {
                    payment_link: format!("https://pay.example/{user_id}"),
                    invoice_id: "inv-1".into(),
                    breakdown: breakdown.clone(),
                },
            ))
        }

        async fn get_user_transactions(
            &self,
            _token: &str,
            _user_id: &str,
        ) -> Result<ApiResponse<Vec<Transaction>>, ErrorResponse> {
            let transactions = serde_json::from_value(json!([
                { "_id": "old", "amount": 100, "createdAt": "2025-01-01T10:00:00Z", "paymentTransactionId": "PG-1" },
                { "_id": "new", "amount": 200, "createdAt": "2025-03-01T10:00:00Z", "paymentTransactionId": "PG-2" },
                { "_id": "fresh", "amount": 300 }
            ]))
            .unwrap();
            Ok(ApiResponse::success("ok", transactions))
        }
    }

    struct FakeUsers;

    #[async_trait]
    impl UserServiceTrait for FakeUsers {
        async fn get_users(
            &self,
            _token: &str,
            req: &FindAllUserRequest,
        ) -> Result<ApiResponse<Vec<UserProfile>>, ErrorResponse> {
            let users = [profile("asha", "user"), profile("ravi", "user")]
                .into_iter()
                .filter(|u| u.email_matches(&req.search))
                .collect();
            Ok(ApiResponse::success("ok", users))
        }
    }

    struct FakeLookup;

    #[async_trait]
    impl PaymentStatusLookupTrait for FakeLookup {
        async fn lookup_status(&self, reference: &str) -> Result<PaymentStatus, AppError> {
            match reference {
                "PG-1" => Ok(PaymentStatus::Completed),
                _ => Err(AppError::Upstream {
                    status: 500,
                    message: "gateway down".into(),
                }),
            }
        }
    }

    fn state() -> Arc<AppState> {
        let status_lookup: shared::abstract_trait::DynPaymentStatusLookup = Arc::new(FakeLookup);
        let ist = FixedOffset::east_opt(330 * 60).unwrap();

        let di_container = DependenciesInject {
            auth_service: Arc::new(FakeAuth),
            profile_service: Arc::new(FakeProfile),
            payment_service: Arc::new(FakePayments),
            user_service: Arc::new(FakeUsers),
            status_lookup: status_lookup.clone(),
            fee_calculator: Arc::new(FeeCalculator::new(FeeConfig {
                fee_rate: dec!(1.80),
                tax_rate: dec!(18),
                minimum_amount: dec!(50),
            })),
            history: TransactionHistory::new(
                StatusReconciler::new(status_lookup, Duration::from_secs(5)),
                SettlementCalendar::new(Vec::<chrono::NaiveDate>::new(), ist),
                chrono::Duration::hours(24),
            ),
        };

        Arc::new(AppState {
            registry: Arc::new(Mutex::new(Registry::default())),
            metrics: Arc::new(Mutex::new(Metrics::new())),
            di_container,
            sessions: SessionStore::new(chrono::Duration::minutes(60)),
        })
    }

    async fn spawn(state: Arc<AppState>) -> String {
        let app = AppRouter::router(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fee_quote_is_public_and_validates_minimum() {
        let base = spawn(state()).await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{base}/api/fees/quote"))
            .json(&json!({ "amount": "1000" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"]["receive_amount"], "978.76");

        let response = http
            .post(format!("{base}/api/fees/quote"))
            .json(&json!({ "amount": "10" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn login_sets_cookie_and_logout_ends_session() {
        let state = state();
        let base = spawn(state.clone()).await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{base}/api/auth/login"))
            .json(&json!({ "email": "asha@example.com", "password": "secret-pass" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("token=user-token"));
        assert!(state.sessions.get("user-token").await.is_some());

        let response = http
            .post(format!("{base}/api/auth/logout"))
            .header(AUTHORIZATION, "Bearer user-token")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn rejected_token_ends_session() {
        let state = state();
        state.sessions.establish("stale", profile("asha", "user")).await;
        let base = spawn(state.clone()).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/api/transactions"))
            .header(AUTHORIZATION, "Bearer stale")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
        assert!(state.sessions.get("stale").await.is_none());
    }

    #[tokio::test]
    async fn backend_outage_keeps_session() {
        let state = state();
        state.sessions.establish("outage-token", profile("asha", "user")).await;
        let base = spawn(state.clone()).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/api/transactions"))
            .header(AUTHORIZATION, "Bearer outage-token")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 502);
        assert!(state.sessions.get("outage-token").await.is_some());
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let base = spawn(state()).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/api/auth/me"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn admin_routes_require_admin_role() {
        let base = spawn(state()).await;
        let http = reqwest::Client::new();

        let response = http
            .get(format!("{base}/api/admin/users"))
            .header(AUTHORIZATION, "Bearer user-token")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 403);

        let response = http
            .get(format!("{base}/api/admin/users?search=RAVI"))
            .header(AUTHORIZATION, "Bearer admin-token")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["_id"], "ravi");
    }

    #[tokio::test]
    async fn transactions_are_sorted_and_reconciled() {
        let base = spawn(state()).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/api/transactions"))
            .header(AUTHORIZATION, "Bearer user-token")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        let data = body["data"].as_array().unwrap();
        let ids: Vec<_> = data.iter().map(|t| t["_id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["new", "old", "fresh"]);

        assert_eq!(data[0]["display_status"], "failed");
        assert_eq!(data[1]["display_status"], "completed");
        assert_eq!(data[2]["display_status"], "pending");
        assert_eq!(data[1]["settlement_date"], "2025-01-02");
        assert_eq!(data[2]["link_expired"], true);
    }

    #[tokio::test]
    async fn payment_status_lookup_failure_reads_as_failed() {
        let base = spawn(state()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/payment-status"))
            .header(AUTHORIZATION, "Bearer user-token")
            .json(&json!({ "payment_transaction_id": "PG-404" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"]["status"], "failed");
    }

    #[tokio::test]
    async fn blank_payment_reference_is_rejected() {
        let base = spawn(state()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/payment-status"))
            .header(AUTHORIZATION, "Bearer user-token")
            .json(&json!({ "payment_transaction_id": "   " }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "fail");
    }

    #[tokio::test]
    async fn payment_link_uses_session_user() {
        let base = spawn(state()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/payments"))
            .header(AUTHORIZATION, "Bearer user-token")
            .json(&json!({
                "amount": "1000",
                "mobile_number": "9876543210",
                "email": "payer@example.com"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"]["payment_link"], "https://pay.example/asha");
        assert_eq!(body["data"]["breakdown"]["service_fee"], "18.00");
    }
}
