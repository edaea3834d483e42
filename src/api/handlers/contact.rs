//! Contact-form endpoint.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::error;

use crate::api::behavior::BehaviorEvent;
use crate::api::email::{ContactMailer, ContactMessage};

use super::auth::{
    AuthState,
    types::{ContactRequest, MessageResponse, ValidationErrorResponse},
    validate_contact,
};

/// Shape a validated request for delivery. Whitespace-only optional fields
/// are dropped, retained values are trimmed.
fn contact_message(request: ContactRequest) -> ContactMessage {
    let normalize = |value: Option<String>| {
        value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    ContactMessage {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        company: normalize(request.company),
        enquiry_type: normalize(request.enquiry_type),
        message: request.message,
    }
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message accepted", body = MessageResponse),
        (status = 400, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Delivery failed", body = MessageResponse),
        (status = 503, description = "Contact form disabled (no mail backend configured)", body = MessageResponse)
    ),
    tag = "contact"
)]
pub async fn contact(
    mailer: Extension<Arc<ContactMailer>>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ContactRequest>>,
) -> impl IntoResponse {
    let request: ContactRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let errors = validate_contact(&request);
    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorResponse { errors }),
        )
            .into_response();
    }

    // Configuration was checked at startup; an unconfigured mailer means the
    // endpoint is disabled, not that each request should fail deep in delivery.
    if !mailer.is_configured() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(MessageResponse::new("Contact form is currently unavailable")),
        )
            .into_response();
    }

    match mailer.send(&contact_message(request)).await {
        Ok(()) => {
            auth_state.tracker().record(BehaviorEvent::ContactSubmitted);
            (
                StatusCode::OK,
                Json(MessageResponse::new("Thanks for reaching out")),
            )
                .into_response()
        }
        Err(err) => {
            error!("Failed to deliver contact message: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Failed to send message")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::behavior::NoopBehaviorTracker;
    use crate::api::handlers::auth::AuthConfig;
    use anyhow::Result;
    use axum::body::to_bytes;

    fn auth_state() -> Arc<AuthState> {
        Arc::new(AuthState::new(
            AuthConfig::new("http://localhost:3000".to_string()),
            Arc::new(NoopBehaviorTracker),
        ))
    }

    fn disabled_mailer() -> Arc<ContactMailer> {
        Arc::new(ContactMailer::disabled(
            "from@x".to_string(),
            "to@x".to_string(),
        ))
    }

    fn log_mailer() -> Arc<ContactMailer> {
        Arc::new(ContactMailer::log("from@x".to_string(), "to@x".to_string()))
    }

    fn request(message: &str) -> ContactRequest {
        ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            enquiry_type: None,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn contact_missing_payload_is_bad_request() {
        let response = contact(Extension(log_mailer()), Extension(auth_state()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contact_missing_message_mentions_required() -> Result<()> {
        let response = contact(
            Extension(log_mailer()),
            Extension(auth_state()),
            Some(Json(request(""))),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let text = String::from_utf8(body.to_vec())?;
        assert!(text.contains("required"));
        Ok(())
    }

    #[tokio::test]
    async fn contact_disabled_mailer_is_service_unavailable() {
        let response = contact(
            Extension(disabled_mailer()),
            Extension(auth_state()),
            Some(Json(request("Hello"))),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn contact_message_trims_retained_optional_fields() {
        let mut req = request("Hello");
        req.name = " Ada ".to_string();
        req.company = Some(" Analytical Engines ".to_string());
        req.enquiry_type = Some("   ".to_string());

        let message = contact_message(req);
        assert_eq!(message.name, "Ada");
        assert_eq!(message.company.as_deref(), Some("Analytical Engines"));
        assert_eq!(message.enquiry_type, None);
    }

    #[tokio::test]
    async fn contact_log_mailer_accepts_submission() {
        let response = contact(
            Extension(log_mailer()),
            Extension(auth_state()),
            Some(Json(request("Hello"))),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
