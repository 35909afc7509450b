use std::{sync::Arc, time::SystemTime};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;

use crate::dao::{
    models::{PlayerSaveEntity, SaveFields},
    save_store::SaveStore,
    storage::StorageResult,
};

/// In-process save store keyed by player identifier.
///
/// Each upsert runs under the shard lock of its key, so concurrent saves for the same player are
/// applied one after the other.
#[derive(Clone, Default)]
pub struct MemorySaveStore {
    saves: Arc<DashMap<String, PlayerSaveEntity>>,
}

impl MemorySaveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.saves.len()
    }

    /// Whether the store holds no record.
    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }

    fn upsert(&self, player_id: String, fields: SaveFields) -> StorageResult<PlayerSaveEntity> {
        let now = SystemTime::now();
        match self.saves.entry(player_id) {
            Entry::Occupied(mut entry) => {
                let mut updated = entry.get().clone();
                fields.apply_to(&mut updated, now);
                updated.check_constraints()?;
                entry.insert(updated.clone());
                Ok(updated)
            }
            Entry::Vacant(entry) => {
                let created = PlayerSaveEntity::create(entry.key().clone(), fields, now);
                created.check_constraints()?;
                Ok(entry.insert(created).value().clone())
            }
        }
    }
}

impl SaveStore for MemorySaveStore {
    fn save_or_create(
        &self,
        player_id: String,
        fields: SaveFields,
    ) -> BoxFuture<'static, StorageResult<PlayerSaveEntity>> {
        let result = self.upsert(player_id, fields);
        Box::pin(async move { result })
    }

    fn find_save(
        &self,
        player_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerSaveEntity>>> {
        let found = self.saves.get(&player_id).map(|entry| entry.value().clone());
        Box::pin(async move { Ok(found) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{models::DEFAULT_SKIN, storage::StorageError};

    fn progress(value: f64) -> SaveFields {
        SaveFields {
            progreso_vinedo: Some(value),
            ..SaveFields::default()
        }
    }

    #[tokio::test]
    async fn second_save_updates_the_same_record() {
        let store = MemorySaveStore::new();

        let first = store.save_or_create("p1".into(), progress(40.0)).await.unwrap();
        let second = store.save_or_create("p1".into(), progress(55.0)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(second.progreso_vinedo, 55.0);
        assert_eq!(second.skin_actual, DEFAULT_SKIN);
        assert_eq!(second.vidas_restantes, 3.0);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn rejected_update_leaves_record_untouched() {
        let store = MemorySaveStore::new();
        store.save_or_create("p1".into(), progress(40.0)).await.unwrap();

        let err = store
            .save_or_create("p1".into(), progress(140.0))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Constraint { field: "progresoVinedo", .. }));
        let stored = store.find_save("p1".into()).await.unwrap().unwrap();
        assert_eq!(stored.progreso_vinedo, 40.0);
    }

    #[tokio::test]
    async fn rejected_create_stores_nothing() {
        let store = MemorySaveStore::new();

        let result = store.save_or_create("p1".into(), progress(-1.0)).await;

        assert!(result.is_err());
        assert!(store.is_empty());
        assert!(store.find_save("p1".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_saves_end_in_one_of_the_written_states() {
        let store = MemorySaveStore::new();
        store.save_or_create("p1".into(), progress(10.0)).await.unwrap();

        let handles: Vec<_> = [20.0, 30.0]
            .into_iter()
            .map(|value| {
                let store = store.clone();
                tokio::spawn(async move { store.save_or_create("p1".into(), progress(value)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.find_save("p1".into()).await.unwrap().unwrap();
        assert_eq!(store.len(), 1);
        assert!(stored.progreso_vinedo == 20.0 || stored.progreso_vinedo == 30.0);
    }
}
