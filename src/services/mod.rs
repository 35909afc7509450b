/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Save and load of player progress.
pub mod save_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;
