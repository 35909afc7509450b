use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::health::{HealthResponse, LIVENESS_MESSAGE},
    services::health_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = String, content_type = "text/plain"))
)]
/// Liveness check. Answers without touching storage.
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "health",
    responses((status = 200, description = "Storage status", body = HealthResponse))
)]
/// Ping the store and report whether the backend runs degraded.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(health_service::health_status(&state).await)
}

/// Liveness and health routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(liveness))
        .route("/healthcheck", get(healthcheck))
}
