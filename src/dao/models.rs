use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::dao::storage::{StorageError, StorageResult};

/// Skin assigned to a player who never picked one.
pub const DEFAULT_SKIN: &str = "julian_normal";
/// Vineyard progress of a brand-new save.
pub const DEFAULT_PROGRESS: f64 = 0.0;
/// Lives granted to a brand-new save.
pub const DEFAULT_LIVES: f64 = 3.0;
/// Item every new inventory starts with.
pub const DEFAULT_ITEM: &str = "vial_basico";
/// Upper bound (inclusive) of the vineyard progress percentage.
pub const MAX_PROGRESS: f64 = 100.0;

/// Persisted progress of a single player, one record per `player_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSaveEntity {
    /// Identity key of the record.
    pub player_id: String,
    /// Skin currently worn by the player.
    pub skin_actual: String,
    /// Vineyard completion percentage, within `[0, 100]`.
    pub progreso_vinedo: f64,
    /// Remaining lives, never negative.
    pub vidas_restantes: f64,
    /// Ordered list of item identifiers.
    pub inventario: Vec<String>,
    /// Whether the player finished the game.
    pub partida_completada: bool,
    /// Creation time of the record.
    pub created_at: SystemTime,
    /// Last time the record was written.
    pub updated_at: SystemTime,
}

/// Fields supplied by a save request. `None` means "not provided".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveFields {
    pub skin_actual: Option<String>,
    pub progreso_vinedo: Option<f64>,
    pub vidas_restantes: Option<f64>,
    pub inventario: Option<Vec<String>>,
    pub partida_completada: Option<bool>,
}

impl PlayerSaveEntity {
    /// A record holding only default values, stamped with `now`.
    pub fn with_defaults(player_id: impl Into<String>, now: SystemTime) -> Self {
        Self {
            player_id: player_id.into(),
            skin_actual: DEFAULT_SKIN.to_owned(),
            progreso_vinedo: DEFAULT_PROGRESS,
            vidas_restantes: DEFAULT_LIVES,
            inventario: vec![DEFAULT_ITEM.to_owned()],
            partida_completada: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a new record: defaults overridden by the provided fields.
    pub fn create(player_id: impl Into<String>, fields: SaveFields, now: SystemTime) -> Self {
        let mut record = Self::with_defaults(player_id, now);
        fields.apply_to(&mut record, now);
        record
    }

    /// Check the store-level constraints of the record.
    pub fn check_constraints(&self) -> StorageResult<()> {
        if self.player_id.is_empty() {
            return Err(StorageError::constraint("playerId", "must not be empty"));
        }
        if !(DEFAULT_PROGRESS..=MAX_PROGRESS).contains(&self.progreso_vinedo) {
            return Err(StorageError::constraint(
                "progresoVinedo",
                format!("{} is outside [0, 100]", self.progreso_vinedo),
            ));
        }
        if !(self.vidas_restantes >= 0.0) {
            return Err(StorageError::constraint(
                "vidasRestantes",
                format!("{} is not a non-negative number", self.vidas_restantes),
            ));
        }
        Ok(())
    }
}

impl SaveFields {
    /// Overwrite the fields of `record` that were provided, leaving the rest untouched.
    pub fn apply_to(self, record: &mut PlayerSaveEntity, now: SystemTime) {
        if let Some(skin) = self.skin_actual {
            record.skin_actual = skin;
        }
        if let Some(progress) = self.progreso_vinedo {
            record.progreso_vinedo = progress;
        }
        if let Some(lives) = self.vidas_restantes {
            record.vidas_restantes = lives;
        }
        if let Some(inventory) = self.inventario {
            record.inventario = inventory;
        }
        if let Some(completed) = self.partida_completada {
            record.partida_completada = completed;
        }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn create_fills_omitted_fields_with_defaults() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let fields = SaveFields {
            progreso_vinedo: Some(40.0),
            ..SaveFields::default()
        };

        let record = PlayerSaveEntity::create("p1", fields, now);

        assert_eq!(record.player_id, "p1");
        assert_eq!(record.progreso_vinedo, 40.0);
        assert_eq!(record.skin_actual, DEFAULT_SKIN);
        assert_eq!(record.vidas_restantes, DEFAULT_LIVES);
        assert_eq!(record.inventario, vec![DEFAULT_ITEM.to_string()]);
        assert!(!record.partida_completada);
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
    }

    #[test]
    fn apply_to_only_touches_provided_fields() {
        let created = SystemTime::UNIX_EPOCH;
        let later = created + Duration::from_secs(60);
        let mut record = PlayerSaveEntity::create(
            "p1",
            SaveFields {
                skin_actual: Some("julian_dorado".into()),
                vidas_restantes: Some(1.0),
                ..SaveFields::default()
            },
            created,
        );

        SaveFields {
            progreso_vinedo: Some(55.0),
            inventario: Some(vec!["tijeras".into(), "cesta".into()]),
            ..SaveFields::default()
        }
        .apply_to(&mut record, later);

        assert_eq!(record.skin_actual, "julian_dorado");
        assert_eq!(record.vidas_restantes, 1.0);
        assert_eq!(record.progreso_vinedo, 55.0);
        assert_eq!(record.inventario, vec!["tijeras", "cesta"]);
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn constraints_reject_out_of_range_values() {
        let now = SystemTime::now();
        let mut record = PlayerSaveEntity::with_defaults("p1", now);
        assert!(record.check_constraints().is_ok());

        record.progreso_vinedo = 100.5;
        assert!(matches!(
            record.check_constraints(),
            Err(StorageError::Constraint { field: "progresoVinedo", .. })
        ));

        record.progreso_vinedo = 100.0;
        record.vidas_restantes = -1.0;
        assert!(matches!(
            record.check_constraints(),
            Err(StorageError::Constraint { field: "vidasRestantes", .. })
        ));
    }

    #[test]
    fn constraints_reject_empty_player_id() {
        let record = PlayerSaveEntity::with_defaults("", SystemTime::now());
        assert!(matches!(
            record.check_constraints(),
            Err(StorageError::Constraint { field: "playerId", .. })
        ));
    }
}
