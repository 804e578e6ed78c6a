// handlers/public/mod.rs - endpoints without authentication

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "content": {
            "name": "Creations API",
            "version": version,
            "description": "AI content generation gateway with free-usage metering",
            "endpoints": {
                "health": "/health (public)",
                "ai": "/api/ai/{generate-article, generate-blog-title, generate-image, remove-image-background, remove-image-object, resume-review} (protected)",
                "user": "/api/user/{get-user-creations, get-published-creations} (protected)",
            }
        }
    }))
}

/// GET /health - database connectivity probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "content": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "content": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
