//! Password login endpoint.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::behavior::BehaviorEvent;

use super::{
    session::session_cookie,
    state::AuthState,
    storage::{CredentialRecord, insert_session, lookup_credentials},
    types::{AuthResponse, LoginRequest, MessageResponse, ValidationErrorResponse},
    utils::{
        generate_session_token, hash_session_token, mask_missing_account, normalize_email,
        verify_password,
    },
    validate::validate_login,
};

/// One message for unknown account and wrong password; the difference must
/// not be observable.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Map the looked-up credentials to the authenticated user, or the shared
/// 401 response. An unknown account still burns a password verification so
/// the two failures stay close in timing.
fn check_password(
    credentials: Option<CredentialRecord>,
    password: &str,
) -> Result<CredentialRecord, Response> {
    let unauthorized = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new(INVALID_CREDENTIALS)),
        )
            .into_response()
    };

    match credentials {
        Some(credentials) if verify_password(password, &credentials.password_hash) => {
            Ok(credentials)
        }
        Some(_) => Err(unauthorized()),
        None => {
            mask_missing_account(password);
            Err(unauthorized())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; session cookie set", body = AuthResponse),
        (status = 400, description = "Validation error", body = ValidationErrorResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Login failed", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let errors = validate_login(&request);
    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorResponse { errors }),
        )
            .into_response();
    }

    let email = normalize_email(&request.email);
    let credentials = match lookup_credentials(&pool, &email).await {
        Ok(credentials) => credentials,
        Err(err) => {
            error!("Failed to lookup credentials: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Login failed")),
            )
                .into_response();
        }
    };

    let credentials = match check_password(credentials, &request.password) {
        Ok(credentials) => credentials,
        Err(response) => {
            auth_state.tracker().record(BehaviorEvent::LoginFailed);
            return response;
        }
    };

    let token = match generate_session_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate session token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Login failed")),
            )
                .into_response();
        }
    };

    let token_hash = hash_session_token(&token);
    let ttl_seconds = auth_state.config().session_ttl_seconds();
    if let Err(err) = insert_session(&pool, credentials.user.id, &token_hash, ttl_seconds).await {
        error!("Failed to persist session: {err}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new("Login failed")),
        )
            .into_response();
    }

    let mut headers = HeaderMap::new();
    match session_cookie(auth_state.config(), &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Login failed")),
            )
                .into_response();
        }
    }

    auth_state.tracker().record(BehaviorEvent::LoginSucceeded);
    (
        StatusCode::OK,
        headers,
        Json(AuthResponse {
            user: credentials.user.into(),
        }),
    )
        .into_response()
}
