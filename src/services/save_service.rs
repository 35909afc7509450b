use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::save::{PlayerSaveDto, SaveRequest},
    error::ServiceError,
    state::SharedState,
};

/// Validate `request` and upsert the player's save, returning the stored record.
pub async fn save_progress(
    state: &SharedState,
    request: SaveRequest,
) -> Result<PlayerSaveDto, ServiceError> {
    request.validate()?;
    let store = state.require_save_store().await?;

    let (player_id, fields) = request.into_parts();
    let saved = store
        .save_or_create(player_id.clone(), fields)
        .await
        .inspect_err(|err| warn!(player_id = %player_id, error = %err, "player save failed"))?;

    info!(player_id = %saved.player_id, "player save stored");
    Ok(saved.into())
}

/// Fetch the stored save of `player_id`.
pub async fn load_progress(
    state: &SharedState,
    player_id: String,
) -> Result<PlayerSaveDto, ServiceError> {
    let store = state.require_save_store().await?;

    let Some(save) = store.find_save(player_id.clone()).await? else {
        return Err(ServiceError::NotFound(format!(
            "save for player `{player_id}` not found"
        )));
    };

    Ok(save.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        dao::save_store::{MemorySaveStore, SaveStore},
        state::AppState,
    };

    fn request(body: serde_json::Value) -> SaveRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn save_then_update_keeps_defaults_from_first_save() {
        let store = MemorySaveStore::new();
        let state = AppState::with_store(Arc::new(store.clone()));

        save_progress(&state, request(json!({ "playerId": "p1", "progresoVinedo": 40 })))
            .await
            .unwrap();
        let saved = save_progress(&state, request(json!({ "playerId": "p1", "progresoVinedo": 55 })))
            .await
            .unwrap();

        assert_eq!(saved.progreso_vinedo, 55.0);
        assert_eq!(saved.skin_actual, "julian_normal");
        assert_eq!(saved.vidas_restantes, 3.0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_store() {
        let store = MemorySaveStore::new();
        let state = AppState::with_store(Arc::new(store.clone()));

        let err = save_progress(&state, request(json!({ "playerId": "p1", "progresoVinedo": 101 })))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(store.find_save("p1".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn degraded_state_fails_saves() {
        let state = AppState::new();
        let err = save_progress(&state, request(json!({ "playerId": "p1" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }

    #[tokio::test]
    async fn load_reports_missing_player() {
        let state = AppState::with_store(Arc::new(MemorySaveStore::new()));
        let err = load_progress(&state, "nobody".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
