mod auth;
mod payment;
mod profile;
mod status;
mod tracer;
mod user;

pub use self::auth::AuthService;
pub use self::payment::PaymentService;
pub use self::profile::ProfileService;
pub use self::status::HttpStatusLookup;
pub use self::tracer::ServiceTracer;
pub use self::user::UserService;

use opentelemetry::{Context, global};
use reqwest::{Client, Method as HttpMethod, RequestBuilder, Url, header::HeaderMap};
use serde::{Serialize, de::DeserializeOwned};
use shared::utils::{AppError, HeaderInjector};
use std::time::Duration;

/// Shared HTTP connection to the LessPay backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| AppError::InternalError(format!("Invalid backend URL '{base_url}': {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::InternalError(format!(
                "Backend URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        self.url_from_segments(path.split('/').filter(|s| !s.is_empty()))
    }

    /// Appends each segment to the base URL, percent-encoding `/`, `?`
    /// and `%` so a segment can never address a different path.
    fn url_from_segments<'a, I>(&self, segments: I) -> Result<Url, AppError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InternalError("Backend URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn builder(
        &self,
        cx: &Context,
        method: HttpMethod,
        url: Url,
        token: Option<&str>,
    ) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(cx, &mut HeaderInjector(&mut headers))
        });

        let request = self.http.request(method, url).headers(headers);

        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn get<R>(&self, cx: &Context, path: &str, token: Option<&str>) -> Result<R, AppError>
    where
        R: DeserializeOwned,
    {
        execute(self.builder(cx, HttpMethod::GET, self.url(path)?, token)).await
    }

    /// Like [`BackendClient::get`], for paths that embed caller-supplied
    /// values. Each element of `segments` becomes exactly one path segment.
    pub async fn get_segments<R>(
        &self,
        cx: &Context,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<R, AppError>
    where
        R: DeserializeOwned,
    {
        let url = self.url_from_segments(segments.iter().copied())?;
        execute(self.builder(cx, HttpMethod::GET, url, token)).await
    }

    pub async fn send<B, R>(
        &self,
        cx: &Context,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<R, AppError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        execute(self.builder(cx, method, self.url(path)?, token).json(body)).await
    }
}

async fn execute<R: DeserializeOwned>(request: RequestBuilder) -> Result<R, AppError> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(AppError::Upstream {
            status: status.as_u16(),
            message: upstream_message(&bytes)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string()),
        });
    }

    // Acknowledgement endpoints may answer with an empty body.
    let body: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };

    Ok(serde_json::from_slice(body)?)
}

/// The backend reports failures as `{ "message": "..." }`.
fn upstream_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap as AxumHeaders, StatusCode},
        routing::{get, post},
    };
    use serde_json::{Value, json};

    async fn backend() -> BackendClient {
        let router = Router::new()
            .route(
                "/echo-auth",
                get(|headers: AxumHeaders| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "auth": auth }))
                }),
            )
            .route(
                "/reject",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "message": "OTP expired" })),
                    )
                }),
            )
            .route("/empty", post(|| async { StatusCode::OK }));

        let base = testing::spawn_backend(router).await;
        BackendClient::new(&base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let client = backend().await;

        let body: Value = client
            .get(&Context::current(), "/echo-auth", Some("tok-123"))
            .await
            .unwrap();

        assert_eq!(body["auth"], "Bearer tok-123");
    }

    #[tokio::test]
    async fn surfaces_backend_message_on_failure() {
        let client = backend().await;

        let err = client
            .send::<_, Value>(&Context::current(), HttpMethod::POST, "reject", None, &json!({}))
            .await
            .unwrap_err();

        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "OTP expired");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_success_body_reads_as_object() {
        let client = backend().await;

        let body: Value = client
            .send(&Context::current(), HttpMethod::POST, "/empty", None, &json!({}))
            .await
            .unwrap();

        assert_eq!(body, json!({}));
    }

    #[test]
    fn segments_are_percent_encoded() {
        let client =
            BackendClient::new("http://backend:5000/v1/", Duration::from_secs(5)).unwrap();

        let url = client
            .url_from_segments(["profile", "user-transactions", "a/b?c"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://backend:5000/v1/profile/user-transactions/a%2Fb%3Fc"
        );

        let url = client.url("/api/users").unwrap();
        assert_eq!(url.as_str(), "http://backend:5000/v1/api/users");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(BackendClient::new("not a url", Duration::from_secs(5)).is_err());
    }
}
