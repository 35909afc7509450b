use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the save backend.
#[openapi(
    paths(
        crate::routes::health::liveness,
        crate::routes::health::healthcheck,
        crate::routes::save::save_progress,
        crate::routes::save::load_progress,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::save::SaveRequest,
            crate::dto::save::SaveResponse,
            crate::dto::save::PlayerSaveDto,
        )
    ),
    tags(
        (name = "health", description = "Liveness and storage health"),
        (name = "save", description = "Player progress persistence"),
    )
)]
pub struct ApiDoc;
