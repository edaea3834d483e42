//! Session endpoints and cookie handling.

use axum::{
    Json,
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{InvalidHeaderValue, SET_COOKIE},
    },
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::behavior::BehaviorEvent;

use super::{
    state::{AuthConfig, AuthState},
    storage::{database_ready, delete_session, lookup_session},
    types::{AuthResponse, MessageResponse},
    utils::hash_session_token,
};

pub(crate) const SESSION_COOKIE_NAME: &str = "auth-token";

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user for the session cookie", body = AuthResponse),
        (status = 401, description = "Missing, invalid, or expired session", body = MessageResponse),
        (status = 500, description = "Session lookup failed", body = MessageResponse),
        (status = 503, description = "Database unavailable", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let Some(token) = extract_session_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new("Not authenticated")),
        )
            .into_response();
    };

    // Liveness probe before the session lookup; a down database answers 503
    // rather than surfacing a query error per request.
    if !database_ready(&pool).await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(MessageResponse::new("Service temporarily unavailable")),
        )
            .into_response();
    }

    // Only the hash is stored; never compare raw tokens against the database.
    let token_hash = hash_session_token(&token);
    match lookup_session(&pool, &token_hash).await {
        Ok(Some(user)) => {
            auth_state.tracker().record(BehaviorEvent::SessionResumed);
            (StatusCode::OK, Json(AuthResponse { user: user.into() })).into_response()
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new("Not authenticated")),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to lookup session: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Something went wrong")),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse),
        (status = 500, description = "Session store failure; cookie still cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let mut store_failed = false;
    if let Some(token) = extract_session_token(&headers) {
        let token_hash = hash_session_token(&token);
        if let Err(err) = delete_session(&pool, &token_hash).await {
            error!("Failed to delete session: {err}");
            store_failed = true;
        }
    }

    // The cookie is cleared even when the session row was missing or the
    // delete failed; the client must never keep a token after logout.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build cleared session cookie: {err}");
        }
    }

    if store_failed {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            response_headers,
            Json(MessageResponse::new("Something went wrong")),
        )
            .into_response()
    } else {
        (
            StatusCode::OK,
            response_headers,
            Json(MessageResponse::new("Logged out")),
        )
            .into_response()
    }
}

/// Build the `HttpOnly` cookie carrying a fresh session token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let secure = config.session_cookie_secure();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Cookie that expires immediately (logout).
fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure = config.session_cookie_secure();
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::behavior::NoopBehaviorTracker;
    use anyhow::{Context, Result};
    use axum::http::header::COOKIE;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    fn auth_state(site_url: &str) -> Arc<AuthState> {
        Arc::new(AuthState::new(
            AuthConfig::new(site_url.to_string()),
            Arc::new(NoopBehaviorTracker),
        ))
    }

    // Pool pointing nowhere; acquire fails fast so db-down paths are testable.
    fn unreachable_pool() -> Result<PgPool> {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://postgres@127.0.0.1:1/tradepilot")
            .context("failed to build lazy pool")
    }

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).expect("cookie value"));
        headers
    }

    #[test]
    fn session_cookie_sets_seven_day_expiry_by_default() -> Result<()> {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        let cookie = session_cookie(&config, "tok")?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with("auth-token=tok; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
        Ok(())
    }

    #[test]
    fn session_cookie_secure_in_production() -> Result<()> {
        let config = AuthConfig::new("https://tradepilot.dev".to_string());
        let cookie = session_cookie(&config, "tok")?;
        assert!(cookie.to_str()?.ends_with("; Secure"));
        Ok(())
    }

    #[test]
    fn clear_session_cookie_expires_immediately() -> Result<()> {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        let cookie = clear_session_cookie(&config)?;
        let cookie = cookie.to_str()?;
        assert!(cookie.starts_with("auth-token=; "));
        assert!(cookie.contains("Max-Age=0"));
        Ok(())
    }

    #[test]
    fn extract_session_token_finds_cookie_among_others() {
        let headers = cookie_headers("theme=dark; auth-token=abc123; lang=en");
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_session_token_none_without_cookie() {
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
        let headers = cookie_headers("theme=dark");
        assert_eq!(extract_session_token(&headers), None);
    }

    #[tokio::test]
    async fn me_without_cookie_is_unauthorized() -> Result<()> {
        let pool = unreachable_pool()?;
        let response = me(
            HeaderMap::new(),
            Extension(pool),
            Extension(auth_state("http://localhost:3000")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn me_with_cookie_but_db_down_is_service_unavailable() -> Result<()> {
        let pool = unreachable_pool()?;
        let response = me(
            cookie_headers("auth-token=abc123"),
            Extension(pool),
            Extension(auth_state("http://localhost:3000")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        Ok(())
    }

    #[tokio::test]
    async fn logout_without_cookie_still_clears_cookie() -> Result<()> {
        let pool = unreachable_pool()?;
        let response = logout(
            HeaderMap::new(),
            Extension(pool),
            Extension(auth_state("http://localhost:3000")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .context("missing Set-Cookie")?
            .to_str()?;
        assert!(set_cookie.starts_with("auth-token=; "));
        assert!(set_cookie.contains("Max-Age=0"));
        Ok(())
    }

    #[tokio::test]
    async fn logout_with_cookie_and_db_down_reports_error_but_clears_cookie() -> Result<()> {
        let pool = unreachable_pool()?;
        let response = logout(
            cookie_headers("auth-token=abc123"),
            Extension(pool),
            Extension(auth_state("http://localhost:3000")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .context("missing Set-Cookie")?
            .to_str()?;
        assert!(set_cookie.contains("Max-Age=0"));
        Ok(())
    }
}
