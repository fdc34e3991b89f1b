// src/web/handlers/system_handlers.rs
use crate::database::Database;
use crate::web::types::*;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

/// Reports OK once the database answers a trivial query.
pub async fn health_handler(db: &State<Database>) -> ApiResult<TextResponse> {
    sqlx::query("SELECT 1")
        .execute(db.pool())
        .await
        .map_err(|e| {
            error!("Health check failed: {}", e);
            ApiError::new(
                Status::ServiceUnavailable,
                "Database unavailable",
                "DATABASE_UNAVAILABLE",
            )
        })?;

    Ok(Json(TextResponse::success("OK".to_string())))
}
