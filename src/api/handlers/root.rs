use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::state::AppState;

/// Liveness plus a round trip to the database.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.service_context.db_pool)
        .await
        .is_ok();

    let status = if database { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status, Json(json!({
        "name": "ACAD PULSE",
        "version": env!("CARGO_PKG_VERSION"),
        "status": if database { "healthy" } else { "degraded" },
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
