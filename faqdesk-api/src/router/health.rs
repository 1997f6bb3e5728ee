use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::app::AppState;

/// 存储健康检查
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let storage_ok = match state.repositories.health.ping().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!("Storage health check failed: {:#}", e);
            false
        }
    };

    let (status, label) = if storage_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status,
        Json(json!({
            "status": label,
            "storage": storage_ok,
            "model": state.completion.model(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
