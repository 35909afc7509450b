//! Save backend entrypoint wiring the REST routes to the configured storage backend.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wine_legacy_back::{
    build_router,
    config::{AppConfig, StoreBackend},
    dao::save_store::MemorySaveStore,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let app_state = AppState::new();

    start_storage(app_state.clone(), &config).await;
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the configured store. MongoDB is connected in the background so the server answers
/// (in degraded mode) while the database is unreachable.
async fn start_storage(state: SharedState, config: &AppConfig) {
    match config.backend {
        StoreBackend::Memory => {
            info!("using in-memory save store; saves are lost on restart");
            state.set_save_store(Arc::new(MemorySaveStore::new())).await;
        }
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            tokio::spawn(mongo::supervise(
                state,
                config.mongo_uri.clone(),
                config.mongo_db.clone(),
            ));
        }
        #[cfg(not(feature = "mongo-store"))]
        StoreBackend::Mongo => {
            tracing::warn!("built without the mongo-store feature; using in-memory save store");
            state.set_save_store(Arc::new(MemorySaveStore::new())).await;
        }
    }
}

#[cfg(feature = "mongo-store")]
mod mongo {
    use std::sync::Arc;

    use wine_legacy_back::{
        dao::{
            save_store::{
                SaveStore,
                mongodb::{MongoConfig, MongoSaveStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
        state::SharedState,
    };

    /// Keep a MongoDB store installed for as long as the process runs.
    pub async fn supervise(state: SharedState, uri: String, db_name: Option<String>) {
        storage_supervisor::run(state, move || {
            let uri = uri.clone();
            let db_name = db_name.clone();
            async move {
                let config = MongoConfig::from_uri(&uri, db_name.as_deref())
                    .await
                    .map_err(StorageError::from)?;
                let store = MongoSaveStore::connect(config)
                    .await
                    .map_err(StorageError::from)?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn SaveStore>)
            }
        })
        .await
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
