//! Liveness and readiness probe.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::app::App;

/// `GET /health`. Unauthenticated.
///
/// 200 when the database answers and required settings are present,
/// 503 otherwise.
pub async fn health(State(app): State<Arc<App>>) -> (StatusCode, Json<Value>) {
    let started = Instant::now();
    let version = env!("CARGO_PKG_VERSION");
    let timestamp = || Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let elapsed_ms = |at: Instant| at.elapsed().as_millis() as u64;

    if let Err(e) = app.ping_database() {
        tracing::warn!(error = %e, "health check: database unavailable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "message": "Health check failed",
                "error": "database unavailable",
                "version": version,
                "timestamp": timestamp(),
                "responseTime": elapsed_ms(started),
            })),
        );
    }

    let missing = app.settings().missing_required();
    if !missing.is_empty() {
        tracing::warn!(?missing, "health check: required settings missing");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "message": "Missing required configuration",
                "details": { "missing": missing },
                "version": version,
                "timestamp": timestamp(),
                "responseTime": elapsed_ms(started),
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "message": "All systems operational",
            "version": version,
            "timestamp": timestamp(),
            "responseTime": elapsed_ms(started),
            "checks": {
                "database": "connected",
                "auth": "configured",
            },
        })),
    )
}
