use serde::Serialize;
use utoipa::ToSchema;

/// Plain-text body of the liveness check on `/`.
pub const LIVENESS_MESSAGE: &str = "🍇 Servidor de The Wine Legacy Activo y Funcionando 🍇";

/// Storage-aware status reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// A store is installed and answered its last check.
    Ok,
    /// No usable store; saves fail until it comes back.
    Degraded,
}

/// Response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Build the response from the degraded flag.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}
