use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::{
    dto::save::{SaveRequest, SaveResponse},
    error::AppError,
    services::save_service,
    state::SharedState,
};

/// Routes storing and fetching player progress.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/save", post(save_progress))
        .route("/api/save/{player_id}", get(load_progress))
}

/// Create or update the save of a player.
#[utoipa::path(
    post,
    path = "/api/save",
    tag = "save",
    request_body = SaveRequest,
    responses(
        (status = 200, description = "Save stored", body = SaveResponse),
        (status = 500, description = "Save failed")
    )
)]
pub async fn save_progress(
    State(state): State<SharedState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let saved = save_service::save_progress(&state, request).await?;
    Ok(Json(SaveResponse::saved(saved)))
}

/// Fetch the save of a player.
#[utoipa::path(
    get,
    path = "/api/save/{player_id}",
    tag = "save",
    params(("player_id" = String, Path, description = "Identifier of the player")),
    responses(
        (status = 200, description = "Save found", body = SaveResponse),
        (status = 404, description = "No save for this player"),
        (status = 500, description = "Lookup failed")
    )
)]
pub async fn load_progress(
    State(state): State<SharedState>,
    Path(player_id): Path<String>,
) -> Result<Json<SaveResponse>, AppError> {
    let save = save_service::load_progress(&state, player_id).await?;
    Ok(Json(SaveResponse::loaded(save)))
}
