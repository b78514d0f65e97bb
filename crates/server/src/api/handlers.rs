use axum::Json;
use serde::Serialize;

use crate::metrics::encode_metrics;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe: stateless, answers regardless of ongoing merges.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn metrics() -> String {
    encode_metrics()
}
