use std::{sync::Arc, time::SystemTime};

use futures::future::BoxFuture;
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult, is_namespace_exists_code, server_code},
    models::{MongoPlayerSaveDocument, player_filter, save_validator, upsert_update},
};
use crate::dao::{
    models::{PlayerSaveEntity, SaveFields},
    save_store::SaveStore,
    storage::StorageResult,
};

const SAVE_COLLECTION_NAME: &str = "player_saves";

/// How the `$jsonSchema` validator reaches the save collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidatorInstall {
    /// Collection missing: create it with the validator.
    Create,
    /// Collection present: replace its validator with `collMod`, which needs `dbAdmin`.
    Update,
}

impl ValidatorInstall {
    fn for_collection(exists: bool) -> Self {
        if exists {
            ValidatorInstall::Update
        } else {
            ValidatorInstall::Create
        }
    }

    /// Whether a failure with server `code` can be logged and ignored. Updates may always fail
    /// (read/write users cannot run `collMod`); a create only when another instance won the race.
    fn may_skip(self, code: Option<i32>) -> bool {
        match self {
            ValidatorInstall::Update => true,
            ValidatorInstall::Create => is_namespace_exists_code(code),
        }
    }
}

/// MongoDB-backed save store. Cloning shares the underlying client.
#[derive(Clone)]
pub struct MongoSaveStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoSaveStore {
    /// Establish a connection to MongoDB and make sure the collection is ready.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_validator().await?;
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_validator(&self) -> MongoResult<()> {
        let database = self.database().await;
        let map_err = |source: mongodb::error::Error| MongoDaoError::EnsureValidator {
            collection: SAVE_COLLECTION_NAME,
            source,
        };

        let existing = database.list_collection_names().await.map_err(map_err)?;
        let install =
            ValidatorInstall::for_collection(existing.iter().any(|name| name == SAVE_COLLECTION_NAME));

        let result = match install {
            ValidatorInstall::Create => database
                .create_collection(SAVE_COLLECTION_NAME)
                .validator(save_validator())
                .await,
            ValidatorInstall::Update => database
                .run_command(doc! {
                    "collMod": SAVE_COLLECTION_NAME,
                    "validator": save_validator(),
                })
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => Ok(()),
            Err(source) if install.may_skip(server_code(&source)) => {
                warn!(
                    collection = SAVE_COLLECTION_NAME,
                    error = %source,
                    "could not refresh collection validator; keeping the existing one"
                );
                Ok(())
            }
            Err(source) => Err(map_err(source)),
        }
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;
        let index = mongodb::IndexModel::builder()
            .keys(doc! { "playerId": 1 })
            .options(
                IndexOptions::builder()
                    .name(Some("player_id_unique_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SAVE_COLLECTION_NAME,
                index: "playerId",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn collection(&self) -> Collection<MongoPlayerSaveDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoPlayerSaveDocument>(SAVE_COLLECTION_NAME)
    }

    async fn save_or_create(
        &self,
        player_id: String,
        fields: SaveFields,
    ) -> MongoResult<PlayerSaveEntity> {
        let collection = self.collection().await;
        let update = upsert_update(&player_id, fields, SystemTime::now());
        debug!(player_id = %player_id, "upserting player save");

        let document = collection
            .find_one_and_update(player_filter(&player_id), update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::SavePlayer {
                player_id: player_id.clone(),
                source,
            })?;

        document
            .map(Into::into)
            .ok_or(MongoDaoError::UpsertReturnedNothing { player_id })
    }

    async fn find_save(&self, player_id: String) -> MongoResult<Option<PlayerSaveEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(player_filter(&player_id))
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { player_id, source })?;

        Ok(document.map(Into::into))
    }
}

impl SaveStore for MongoSaveStore {
    fn save_or_create(
        &self,
        player_id: String,
        fields: SaveFields,
    ) -> BoxFuture<'static, StorageResult<PlayerSaveEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .save_or_create(player_id, fields)
                .await
                .map_err(Into::into)
        })
    }

    fn find_save(
        &self,
        player_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerSaveEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_save(player_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
