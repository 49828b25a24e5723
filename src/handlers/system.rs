use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service identification
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Portfolio API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "admin": "/api/admin/setup, /api/admin/login (public)",
            "sections": "/api/portfolio/{hero|about|contact} (GET public, PUT bearer)",
            "collections": "/api/portfolio/{skills|projects}[/:id] (GET public, POST/PUT/DELETE bearer)",
            "health": "/health"
        }
    }))
}

/// GET /health - liveness plus a store round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.portfolio.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
