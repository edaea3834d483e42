//! # TradePilot website API
//!
//! Thin HTTP backend for the TradePilot marketing site. It owns exactly four
//! concerns:
//!
//! - **Credential validation** — shape checks on login/signup/contact payloads,
//!   returning per-field errors before anything touches the database.
//! - **Session authentication** — password login against Postgres (argon2id
//!   hashes), opaque session tokens carried in an `HttpOnly` `auth-token`
//!   cookie and stored hashed in a `sessions` table.
//! - **Contact relay** — forwards contact-form submissions to the Resend email
//!   API. When no API key is configured the endpoint is disabled; no mail
//!   client is ever constructed without one.
//! - **Schema init** — `POST /api/init-db` creates the `users`/`sessions`
//!   tables for fresh environments.
//!
//! Each request is single-shot: validate, call the store, respond. There are
//! no retries and no shared mutable state outside the connection pool.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
