//! Route handlers for the website API.
//!
//! Auth endpoints live under `auth`; the rest are single-file handlers.

pub mod auth;
pub mod contact;
pub mod health;
pub mod init_db;
pub mod root;
