//! Pure shape checks for incoming payloads.
//!
//! Validation runs before any database or mail call; a non-empty error list
//! short-circuits the handler to a 400 with per-field messages.

use super::types::{ContactRequest, FieldError, LoginRequest, SignupRequest};
use super::utils::{normalize_email, valid_email};

/// Signup passwords must be at least this long. Login accepts any non-empty
/// password so legacy accounts can still sign in.
pub(super) const MIN_SIGNUP_PASSWORD_LEN: usize = 8;

pub(super) fn validate_login(request: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !valid_email(&normalize_email(&request.email)) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    errors
}

pub(super) fn validate_signup(request: &SignupRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !valid_email(&normalize_email(&request.email)) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    if request.password.len() < MIN_SIGNUP_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_SIGNUP_PASSWORD_LEN} characters"),
        ));
    }

    errors
}

pub(crate) fn validate_contact(request: &ContactRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    if request.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !valid_email(&normalize_email(&request.email)) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    if request.message.trim().is_empty() {
        errors.push(FieldError::new("message", "Message is required"));
    }

    errors
}
