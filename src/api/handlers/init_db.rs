//! Schema bootstrap endpoint for fresh environments.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use tracing::error;

use super::auth::{init_schema, types::MessageResponse};

#[utoipa::path(
    post,
    path = "/api/init-db",
    responses(
        (status = 200, description = "Schema created or already present", body = MessageResponse),
        (status = 500, description = "Schema creation failed", body = MessageResponse)
    ),
    tag = "admin"
)]
pub async fn init_db(pool: Extension<PgPool>) -> impl IntoResponse {
    match init_schema(&pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new("Database initialized")),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to initialize database schema: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Failed to initialize database")),
            )
                .into_response()
        }
    }
}
