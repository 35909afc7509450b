use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{dao::save_store::SaveStore, error::ServiceError};

/// Cheaply clonable handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle shared by every request.
pub struct AppState {
    save_store: RwLock<Option<Arc<dyn SaveStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new() -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            save_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Construct a state with `store` already installed.
    pub fn with_store(store: Arc<dyn SaveStore>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            save_store: RwLock::new(Some(store)),
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current save store, if one is installed.
    pub async fn save_store(&self) -> Option<Arc<dyn SaveStore>> {
        let guard = self.save_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current save store or fail with [`ServiceError::Degraded`].
    pub async fn require_save_store(&self) -> Result<Arc<dyn SaveStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.save_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new save store implementation and leave degraded mode.
    pub async fn set_save_store(&self, store: Arc<dyn SaveStore>) {
        {
            let mut guard = self.save_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current save store and enter degraded mode.
    pub async fn clear_save_store(&self) {
        {
            let mut guard = self.save_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::save_store::MemorySaveStore;

    #[tokio::test]
    async fn starts_degraded_without_store() {
        let state = AppState::new();
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_save_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_and_clearing_store_toggles_degraded_mode() {
        let state = AppState::new();
        let mut watcher = state.degraded_watcher();

        state.set_save_store(Arc::new(MemorySaveStore::new())).await;
        assert!(!state.is_degraded());
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(state.require_save_store().await.is_ok());

        state.clear_save_store().await;
        assert!(state.is_degraded());
        assert!(*watcher.borrow_and_update());
        assert!(state.save_store().await.is_none());
    }

    #[tokio::test]
    async fn degraded_flag_blocks_an_installed_store() {
        let state = AppState::with_store(Arc::new(MemorySaveStore::new()));
        state.update_degraded(true);
        assert!(matches!(
            state.require_save_store().await,
            Err(ServiceError::Degraded)
        ));
    }
}
