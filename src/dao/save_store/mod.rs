pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{PlayerSaveEntity, SaveFields};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

pub use memory::MemorySaveStore;

/// Abstraction over the persistence layer for player saves.
pub trait SaveStore: Send + Sync {
    /// Upsert the save of `player_id`: create it from defaults when absent, otherwise overwrite
    /// the provided fields. Resolves to the full record as stored.
    fn save_or_create(
        &self,
        player_id: String,
        fields: SaveFields,
    ) -> BoxFuture<'static, StorageResult<PlayerSaveEntity>>;
    fn find_save(&self, player_id: String)
    -> BoxFuture<'static, StorageResult<Option<PlayerSaveEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
