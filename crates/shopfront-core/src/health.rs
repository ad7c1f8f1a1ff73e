use std::sync::LazyLock;
use std::time::Instant;

use axum::Json;
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

static STARTED_AT: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Pin the uptime clock. Call once at service startup.
pub fn mark_started() {
    LazyLock::force(&STARTED_AT);
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since [`mark_started`].
    pub uptime: f64,
}

/// Handler for `GET /health`: status, current time and process uptime.
pub async fn health() -> Json<HealthReport> {
    Json(HealthReport {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: STARTED_AT.elapsed().as_secs_f64(),
    })
}

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: readiness check.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
