//! Database access for users and sessions.
//!
//! Handlers never build SQL inline; everything the auth flow needs from
//! Postgres lives here. Session tokens are stored as SHA-256 hashes and
//! passwords as argon2id hashes, so raw credentials never touch a table.

use anyhow::{Context, Result};
use sqlx::{Connection, PgPool, Row};
use tracing::{Instrument, error, info_span};
use uuid::Uuid;

use super::utils::is_unique_violation;

/// Full user projection returned to the client after auth.
#[derive(Clone, Debug)]
pub(crate) struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) company: Option<String>,
    pub(crate) role: String,
    pub(crate) plan_type: String,
}

/// User plus stored password hash, only used inside the login flow.
pub(super) struct CredentialRecord {
    pub(super) user: UserRecord,
    pub(super) password_hash: String,
}

/// Fields accepted at signup. Everything else gets a column default.
pub(super) struct NewUser<'a> {
    pub(super) email: &'a str,
    pub(super) password_hash: &'a str,
    pub(super) first_name: Option<&'a str>,
    pub(super) last_name: Option<&'a str>,
    pub(super) company: Option<&'a str>,
}

/// Outcome when attempting to create a new user.
pub(super) enum SignupOutcome {
    Created(UserRecord),
    DuplicateEmail,
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, company, role, plan_type";

fn user_from_row(row: &sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        company: row.get("company"),
        role: row.get("role"),
        plan_type: row.get("plan_type"),
    }
}

/// Look up a user and password hash by normalized email (login flow).
pub(super) async fn lookup_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRecord>> {
    let query = "SELECT id, email, first_name, last_name, company, role, plan_type, password_hash \
         FROM users WHERE email = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credentials")?;

    Ok(row.map(|row| CredentialRecord {
        password_hash: row.get("password_hash"),
        user: user_from_row(&row),
    }))
}

/// Insert a new user, reporting duplicate emails as a distinct outcome so the
/// handler can answer 409.
pub(super) async fn insert_user(pool: &PgPool, new_user: NewUser<'_>) -> Result<SignupOutcome> {
    let query = format!(
        "INSERT INTO users (email, password_hash, first_name, last_name, company) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {USER_COLUMNS}"
    );
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.company)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(user_from_row(&row))),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::DuplicateEmail),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Persist a new session token hash with the configured TTL.
pub(super) async fn insert_session(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &[u8],
    ttl_seconds: i64,
) -> Result<()> {
    let query = "INSERT INTO sessions (token_hash, user_id, expires_at) \
         VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .bind(user_id)
        .bind(ttl_seconds)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert session")?;

    Ok(())
}

/// Resolve a session token hash to its user. Expired sessions resolve to
/// `None`, same as unknown tokens.
pub(super) async fn lookup_session(pool: &PgPool, token_hash: &[u8]) -> Result<Option<UserRecord>> {
    let query = "SELECT u.id, u.email, u.first_name, u.last_name, u.company, u.role, u.plan_type \
         FROM sessions s JOIN users u ON u.id = s.user_id \
         WHERE s.token_hash = $1 AND s.expires_at > NOW()";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    Ok(row.map(|row| user_from_row(&row)))
}

/// Delete a session by token hash. Deleting a missing session is a no-op, so
/// logout stays idempotent.
pub(super) async fn delete_session(pool: &PgPool, token_hash: &[u8]) -> Result<()> {
    let query = "DELETE FROM sessions WHERE token_hash = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;

    Ok(())
}

/// Cheap liveness probe consulted before session lookups.
pub(crate) async fn database_ready(pool: &PgPool) -> bool {
    let acquire_span = info_span!(
        "db.acquire",
        db.system = "postgresql",
        db.operation = "ACQUIRE"
    );
    match pool.acquire().instrument(acquire_span).await {
        Ok(mut conn) => {
            let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
            match conn.ping().instrument(ping_span).await {
                Ok(()) => true,
                Err(err) => {
                    error!("Failed to ping database: {err}");
                    false
                }
            }
        }
        Err(err) => {
            error!("Failed to acquire database connection: {err}");
            false
        }
    }
}

const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT,
        last_name TEXT,
        company TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        plan_type TEXT NOT NULL DEFAULT 'free',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token_hash BYTEA PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS sessions_user_id_idx ON sessions (user_id)",
];

/// Create the tables this service owns. Statements are idempotent, so the
/// endpoint can be hit repeatedly.
pub(crate) async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DDL",
            db.statement = statement
        );
        sqlx::query(statement)
            .execute(pool)
            .instrument(span)
            .await
            .with_context(|| format!("failed to execute schema statement: {statement}"))?;
    }

    Ok(())
}
