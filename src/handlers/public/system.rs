use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

/// GET / - service description
pub async fn root() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "DayPat API",
            "version": version,
            "description": "Daily praise journal backend",
            "endpoints": {
                "health": "/health (public)",
                "calendar":
                    "/api/calendar/month/:year/:month, /api/calendar/week?anchor= (protected)",
                "streak": "/api/streak?selected=&today= (protected)",
                "praises": "/api/days/:date/praises, /api/praises/:id (protected)",
                "card": "/api/days/:date/card (protected)",
                "stamp": "/api/days/:date/stamp, /api/stamps (protected)",
                "export": "/api/export/plan?mode=&from=&to= (protected)",
            }
        }
    }))
}

/// GET /health - store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
