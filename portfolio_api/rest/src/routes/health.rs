use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use chrono::{DateTime, Utc};
use portfolio_core_health_contracts::{HealthService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthService>, environment: String) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state((service, environment))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    environment: String,
    version: &'static str,
    email: bool,
    timestamp: DateTime<Utc>,
}

// Reachability problems are reported in the body; the endpoint itself always
// answers 200 so uptime monitors can tell "degraded" from "down".
async fn health(
    State((service, environment)): State<(Arc<impl HealthService>, String)>,
) -> Response {
    let HealthStatus { email } = service.get_status().await;

    Json(HealthResponse {
        status: if email { "healthy" } else { "degraded" },
        service: "portfolio-contact-api",
        environment,
        version: env!("CARGO_PKG_VERSION"),
        email,
        timestamp: Utc::now(),
    })
    .into_response()
}
