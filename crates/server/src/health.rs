use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::crm::HttpCrmClient;

#[derive(Clone)]
pub struct HealthState {
    crm: HttpCrmClient,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub crm: HealthCheck,
    pub checked_at: String,
}

pub fn router(crm: HttpCrmClient) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { crm })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let crm = crm_check(&state.crm).await;
    let ready = crm.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "customer profile subgraph initialized".to_string(),
        },
        crm,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn crm_check(crm: &HttpCrmClient) -> HealthCheck {
    match crm.ping().await {
        Ok(()) => HealthCheck { status: "ready", detail: format!("crm at {} reachable", crm.base_url()) },
        Err(error) => HealthCheck { status: "degraded", detail: format!("crm check failed: {error}") },
    }
}
