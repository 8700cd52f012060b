use axum::{
    Extension, Json,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    domain::response::ErrorResponse,
    service::SessionContext,
    utils::AppError,
};
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// Token from the `token` cookie, falling back to `Authorization: Bearer`.
pub fn session_token(cookie_jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    cookie_jar
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .filter(|token| !token.is_empty())
}

/// Re-validates the session token against the backend on every request and
/// exposes the refreshed [`SessionContext`] as a request extension.
pub async fn session(
    cookie_jar: CookieJar,
    State(data): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let Some(token) = session_token(&cookie_jar, req.headers()) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::from(AppError::Unauthorized)),
        ));
    };

    match data.di_container.profile_service.get_profile(&token).await {
        Ok(response) => {
            let context = data.sessions.refresh(&token, response.data).await;
            req.extensions_mut().insert(context);

            Ok(next.run(req).await)
        }
        Err(e) if e.code == 401 || e.code == 403 => {
            warn!("Session rejected by backend: {}", e.message);
            data.sessions.end(&token).await;

            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::fail(401, "Invalid token")),
            ))
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.code).unwrap_or(StatusCode::BAD_GATEWAY);
            Err((status, Json(e)))
        }
    }
}

/// Must be layered inside [`session`].
pub async fn admin(
    Extension(context): Extension<SessionContext>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    if !context.is_admin() {
        warn!("User {} attempted to reach an admin route", context.user_id());

        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::from(AppError::Forbidden(
                "Administrator access required".into(),
            ))),
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn cookie_wins_over_bearer_header() {
        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(session_token(&jar, &headers).as_deref(), Some("from-cookie"));
        assert_eq!(
            session_token(&CookieJar::new(), &headers).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&CookieJar::new(), &headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(session_token(&CookieJar::new(), &headers), None);
    }
}
