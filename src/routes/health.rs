use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub llm_credentials: String,
}

/// Health check endpoint - public. Reports configuration only; upstream
/// services are not contacted.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let credentials = state.llm_client.credentials().kind();

    let status = match credentials {
        "service_account" | "static_token" => "healthy",
        _ => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: ServiceHealth {
            llm_credentials: credentials.to_string(),
        },
    })
}
