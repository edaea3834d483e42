//! Session-authentication flow.
//!
//! Every request is a single pass: validate the payload, call the user/session
//! store, shape the response. Nothing here retries and nothing is cached; the
//! only client-visible session state is the `auth-token` cookie.
//!
//! Passwords are stored as argon2id hashes and session tokens as SHA-256
//! hashes; raw secrets exist only in the request and the Set-Cookie header.

pub(crate) mod login;
pub(crate) mod session;
pub(crate) mod signup;
mod state;
mod storage;
pub(crate) mod types;
mod utils;
mod validate;

pub use state::{AuthConfig, AuthState};
pub(crate) use storage::{database_ready, init_schema};
pub(crate) use validate::validate_contact;
