use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the installed store, logging failures, and report the degraded flag.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_save_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    HealthResponse::from_degraded(state.is_degraded())
}
