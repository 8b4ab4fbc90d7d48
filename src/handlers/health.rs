// src/handlers/health.rs

use axum::Json;
use serde_json::{Value, json};

/// GET /health
/// Liveness probe; needs no credentials.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
