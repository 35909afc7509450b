use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{MAX_PROGRESS, PlayerSaveEntity, SaveFields},
    dto::{format_system_time, validation::validate_player_id},
};

/// Message returned with a stored save.
pub const SAVE_OK_MESSAGE: &str = "Guardado exitoso";
/// Message returned with a loaded save.
pub const LOAD_OK_MESSAGE: &str = "Partida cargada";

/// Body of `POST /api/save`. Omitted (or `null`) fields keep their stored value, or the default
/// on first save.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[validate(custom(function = "validate_player_id"))]
    pub player_id: String,
    #[serde(default)]
    pub skin_actual: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = MAX_PROGRESS))]
    pub progreso_vinedo: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub vidas_restantes: Option<f64>,
    #[serde(default)]
    pub inventario: Option<Vec<String>>,
    #[serde(default)]
    pub partida_completada: Option<bool>,
}

impl SaveRequest {
    /// Split the request into the record key and the provided fields.
    pub fn into_parts(self) -> (String, SaveFields) {
        let SaveRequest {
            player_id,
            skin_actual,
            progreso_vinedo,
            vidas_restantes,
            inventario,
            partida_completada,
        } = self;

        (
            player_id,
            SaveFields {
                skin_actual,
                progreso_vinedo,
                vidas_restantes,
                inventario,
                partida_completada,
            },
        )
    }
}

/// Public projection of a stored save.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSaveDto {
    pub player_id: String,
    pub skin_actual: String,
    pub progreso_vinedo: f64,
    pub vidas_restantes: f64,
    pub inventario: Vec<String>,
    pub partida_completada: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last save.
    pub updated_at: String,
}

impl From<PlayerSaveEntity> for PlayerSaveDto {
    fn from(value: PlayerSaveEntity) -> Self {
        Self {
            player_id: value.player_id,
            skin_actual: value.skin_actual,
            progreso_vinedo: value.progreso_vinedo,
            vidas_restantes: value.vidas_restantes,
            inventario: value.inventario,
            partida_completada: value.partida_completada,
            created_at: format_system_time(value.created_at),
            updated_at: format_system_time(value.updated_at),
        }
    }
}

/// Successful answer of the save routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResponse {
    pub message: String,
    pub data: PlayerSaveDto,
}

impl SaveResponse {
    pub fn saved(data: PlayerSaveDto) -> Self {
        Self {
            message: SAVE_OK_MESSAGE.into(),
            data,
        }
    }

    pub fn loaded(data: PlayerSaveDto) -> Self {
        Self {
            message: LOAD_OK_MESSAGE.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, SystemTime};

    fn request(body: serde_json::Value) -> SaveRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn omitted_and_null_fields_are_not_provided() {
        let (player_id, fields) = request(json!({
            "playerId": "p1",
            "progresoVinedo": 40,
            "skinActual": null,
        }))
        .into_parts();

        assert_eq!(player_id, "p1");
        assert_eq!(fields.progreso_vinedo, Some(40.0));
        assert_eq!(fields.skin_actual, None);
        assert_eq!(fields.inventario, None);
    }

    #[test]
    fn missing_player_id_does_not_deserialize() {
        let result = serde_json::from_value::<SaveRequest>(json!({ "progresoVinedo": 10 }));
        assert!(result.is_err());
    }

    #[test]
    fn range_validation() {
        assert!(request(json!({ "playerId": "p1", "progresoVinedo": 100 })).validate().is_ok());
        assert!(request(json!({ "playerId": "p1", "progresoVinedo": 0 })).validate().is_ok());
        assert!(request(json!({ "playerId": "p1", "progresoVinedo": 100.1 })).validate().is_err());
        assert!(request(json!({ "playerId": "p1", "progresoVinedo": -5 })).validate().is_err());
        assert!(request(json!({ "playerId": "p1", "vidasRestantes": -1 })).validate().is_err());
        assert!(request(json!({ "playerId": "p1", "vidasRestantes": 2.5 })).validate().is_ok());
        assert!(request(json!({ "playerId": "p1", "vidasRestantes": 0 })).validate().is_ok());
        assert!(request(json!({ "playerId": "  " })).validate().is_ok());
        assert!(request(json!({ "playerId": "" })).validate().is_err());
    }

    #[test]
    fn dto_serializes_camel_case_with_rfc3339_timestamps() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400);
        let entity = PlayerSaveEntity::with_defaults("p1", now);

        let value = serde_json::to_value(PlayerSaveDto::from(entity)).unwrap();

        assert_eq!(value["playerId"], "p1");
        assert_eq!(value["skinActual"], "julian_normal");
        assert_eq!(value["vidasRestantes"], 3.0);
        assert_eq!(value["inventario"], json!(["vial_basico"]));
        assert_eq!(value["partidaCompletada"], false);
        assert_eq!(value["createdAt"], "1970-01-02T00:00:00Z");
    }
}
