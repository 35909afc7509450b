use std::time::SystemTime;

use mongodb::bson::{Bson, DateTime, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::dao::models::{MAX_PROGRESS, PlayerSaveEntity, SaveFields};

/// Shape of a player save inside the `player_saves` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoPlayerSaveDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    player_id: String,
    skin_actual: String,
    progreso_vinedo: f64,
    vidas_restantes: f64,
    inventario: Vec<String>,
    partida_completada: bool,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<MongoPlayerSaveDocument> for PlayerSaveEntity {
    fn from(value: MongoPlayerSaveDocument) -> Self {
        Self {
            player_id: value.player_id,
            skin_actual: value.skin_actual,
            progreso_vinedo: value.progreso_vinedo,
            vidas_restantes: value.vidas_restantes,
            inventario: value.inventario,
            partida_completada: value.partida_completada,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn player_filter(player_id: &str) -> Document {
    doc! { "playerId": player_id }
}

/// Update document for an upsert: provided fields go to `$set`, defaults of the omitted ones to
/// `$setOnInsert` so an existing record keeps its values.
pub fn upsert_update(player_id: &str, fields: SaveFields, now: SystemTime) -> Document {
    let defaults = PlayerSaveEntity::with_defaults(player_id, now);
    let now = DateTime::from_system_time(now);
    let mut set = doc! { "updatedAt": now };
    let mut on_insert = doc! { "createdAt": now };

    let SaveFields {
        skin_actual,
        progreso_vinedo,
        vidas_restantes,
        inventario,
        partida_completada,
    } = fields;

    place(&mut set, &mut on_insert, "skinActual", skin_actual, defaults.skin_actual);
    place(
        &mut set,
        &mut on_insert,
        "progresoVinedo",
        progreso_vinedo,
        defaults.progreso_vinedo,
    );
    place(
        &mut set,
        &mut on_insert,
        "vidasRestantes",
        vidas_restantes,
        defaults.vidas_restantes,
    );
    place(&mut set, &mut on_insert, "inventario", inventario, defaults.inventario);
    place(
        &mut set,
        &mut on_insert,
        "partidaCompletada",
        partida_completada,
        defaults.partida_completada,
    );

    doc! { "$set": set, "$setOnInsert": on_insert }
}

fn place<T: Into<Bson>>(
    set: &mut Document,
    on_insert: &mut Document,
    key: &str,
    provided: Option<T>,
    default: T,
) {
    match provided {
        Some(value) => set.insert(key, value),
        None => on_insert.insert(key, default),
    };
}

/// `$jsonSchema` validator enforcing the record constraints server side.
pub fn save_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["playerId"],
            "properties": {
                "playerId": { "bsonType": "string", "minLength": 1 },
                "skinActual": { "bsonType": "string" },
                "progresoVinedo": {
                    "bsonType": ["double", "int", "long", "decimal"],
                    "minimum": 0,
                    "maximum": MAX_PROGRESS,
                },
                "vidasRestantes": {
                    "bsonType": ["double", "int", "long", "decimal"],
                    "minimum": 0,
                },
                "inventario": { "bsonType": "array", "items": { "bsonType": "string" } },
                "partidaCompletada": { "bsonType": "bool" },
                "createdAt": { "bsonType": "date" },
                "updatedAt": { "bsonType": "date" },
            },
        }
    }
}
