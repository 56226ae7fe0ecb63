//! Readiness endpoint. Liveness (`/health`) comes from `axum_helpers`.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use database::mongodb::check_health_detailed;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    mongodb: bool,
    response_time_ms: u64,
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let health = check_health_detailed(&state.mongo_client).await;

    let status = if health.healthy {
        StatusCode::OK
    } else {
        warn!(error = ?health.message, "MongoDB not reachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyResponse {
            status: if health.healthy { "ready" } else { "unavailable" },
            mongodb: health.healthy,
            response_time_ms: health.response_time_ms,
        }),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
}
