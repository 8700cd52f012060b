use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::UserServiceTrait,
    domain::{
        request::FindAllUserRequest,
        response::{ApiResponse, ErrorResponse},
    },
    model::UserProfile,
    utils::{AppError, Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use super::{BackendClient, ServiceTracer};

#[derive(Debug)]
pub struct UserService {
    client: BackendClient,
    tracer: ServiceTracer,
}

impl UserService {
    pub async fn new(
        client: BackendClient,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        let tracer = ServiceTracer::new("user-service-client", "user", metrics, registry).await;

        Self { client, tracer }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn get_users(
        &self,
        token: &str,
        req: &FindAllUserRequest,
    ) -> Result<ApiResponse<Vec<UserProfile>>, ErrorResponse> {
        info!("Fetching users with search: {:?}", req.search);

        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "GetUsers",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("search", req.search.clone()),
            ],
        );

        let result: Result<Vec<UserProfile>, AppError> =
            self.client.get(&tracing_ctx.cx, "/api/users", Some(token)).await;

        match result {
            Ok(users) => {
                let users: Vec<UserProfile> = users
                    .into_iter()
                    .filter(|user| user.email_matches(&req.search))
                    .collect();

                let message = format!("Found {} users", users.len());

                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, &message)
                    .await;

                Ok(ApiResponse::success(message, users))
            }
            Err(err) => {
                let error_response = ErrorResponse::from(err);

                error!("Failed to fetch users: {}", error_response.message);

                self.tracer
                    .complete_tracing_error(
                        &tracing_ctx,
                        method,
                        &format!("Failed to fetch users: {}", error_response.message),
                    )
                    .await;

                Err(error_response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::spawn_backend;
    use axum::{Json, Router, routing::get};
    use serde_json::json;
    use std::time::Duration;

    async fn service() -> UserService {
        let router = Router::new().route(
            "/api/users",
            get(|| async {
                Json(json!([
                    { "_id": "u1", "email": "Asha@Example.com", "userRole": "user" },
                    { "_id": "u2", "email": "ravi@lesspay.in", "userRole": "admin" },
                    { "_id": "u3", "email": "meera@example.com" }
                ]))
            }),
        );

        let base = spawn_backend(router).await;
        let client = BackendClient::new(&base, Duration::from_secs(5)).unwrap();
        let metrics = Arc::new(Mutex::new(Metrics::new()));
        UserService::new(client, metrics, &mut Registry::default()).await
    }

    #[tokio::test]
    async fn filters_by_email_case_insensitively() {
        let response = service()
            .await
            .get_users(
                "tok",
                &FindAllUserRequest {
                    search: "EXAMPLE".into(),
                },
            )
            .await
            .unwrap();

        let ids: Vec<_> = response.data.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u3"]);
    }

    #[tokio::test]
    async fn empty_search_returns_everyone() {
        let response = service()
            .await
            .get_users("tok", &FindAllUserRequest::default())
            .await
            .unwrap();

        assert_eq!(response.data.len(), 3);
    }
}
