use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness probe that also reports whether the store answers.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    if db_ok {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "pancrepal",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "ok",
            })),
        )
    } else {
        tracing::warn!("Health check could not reach the database");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "service": "pancrepal",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "unreachable",
            })),
        )
    }
}
