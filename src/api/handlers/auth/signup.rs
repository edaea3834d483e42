//! Account creation endpoint.

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
    storage::{NewUser, SignupOutcome, UserRecord, insert_session, insert_user},
    types::{AuthResponse, MessageResponse, SignupRequest, ValidationErrorResponse},
    utils::{generate_session_token, hash_password, hash_session_token, normalize_email},
    validate::validate_signup,
};

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Map the insert outcome to the created user, or the client-facing error
/// response. Duplicate emails answer 409, anything else 500.
fn created_user(outcome: anyhow::Result<SignupOutcome>) -> Result<UserRecord, Response> {
    match outcome {
        Ok(SignupOutcome::Created(user)) => Ok(user),
        Ok(SignupOutcome::DuplicateEmail) => Err((
            StatusCode::CONFLICT,
            Json(MessageResponse::new(
                "An account with this email already exists",
            )),
        )
            .into_response()),
        Err(err) => {
            error!("Signup failed: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Signup failed")),
            )
                .into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; session cookie set", body = AuthResponse),
        (status = 400, description = "Validation error", body = ValidationErrorResponse),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 500, description = "Signup failed", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let errors = validate_signup(&request);
    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorResponse { errors }),
        )
            .into_response();
    }

    let email = normalize_email(&request.email);
    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Signup failed")),
            )
                .into_response();
        }
    };

    let first_name = normalize_optional(request.first_name);
    let last_name = normalize_optional(request.last_name);
    let company = normalize_optional(request.company);

    let outcome = insert_user(
        &pool,
        NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name: first_name.as_deref(),
            last_name: last_name.as_deref(),
            company: company.as_deref(),
        },
    )
    .await;

    let user = match created_user(outcome) {
        Ok(user) => user,
        Err(response) => return response,
    };

    // New accounts are signed in immediately, same cookie flow as login.
    let token = match generate_session_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate session token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Signup failed")),
            )
                .into_response();
        }
    };

    let token_hash = hash_session_token(&token);
    let ttl_seconds = auth_state.config().session_ttl_seconds();
    if let Err(err) = insert_session(&pool, user.id, &token_hash, ttl_seconds).await {
        error!("Failed to persist session: {err}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new("Signup failed")),
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
                Json(MessageResponse::new("Signup failed")),
            )
                .into_response();
        }
    }

    auth_state.tracker().record(BehaviorEvent::SignupCompleted);
    (
        StatusCode::CREATED,
        headers,
        Json(AuthResponse { user: user.into() }),
    )
        .into_response()
}
