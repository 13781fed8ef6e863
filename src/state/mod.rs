//! Central application state shared by every request handler.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    auth::TokenKeys,
    config::AppConfig,
    dao::pick_store::PickStore,
    error::ServiceError,
};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the storage handle, configuration, and
/// token key material.
pub struct AppState {
    pick_store: RwLock<Option<Arc<dyn PickStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
    token_keys: TokenKeys,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, token_keys: TokenKeys) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            pick_store: RwLock::new(None),
            degraded: degraded_tx,
            config,
            token_keys,
        })
    }

    /// Obtain a handle to the current pick store, if one is installed.
    pub async fn pick_store(&self) -> Option<Arc<dyn PickStore>> {
        let guard = self.pick_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the pick store or fail with a degraded-mode error.
    pub async fn require_pick_store(&self) -> Result<Arc<dyn PickStore>, ServiceError> {
        self.pick_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new pick store implementation and leave degraded mode.
    pub async fn set_pick_store(&self, store: Arc<dyn PickStore>) {
        {
            let mut guard = self.pick_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current pick store and enter degraded mode.
    pub async fn clear_pick_store(&self) {
        {
            let mut guard = self.pick_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Key material used to mint and verify bearer tokens.
    pub fn token_keys(&self) -> &TokenKeys {
        &self.token_keys
    }
}

#[cfg(test)]
/// Test helper constructing a state with defaults and an installed memory store.
pub async fn test_state() -> SharedState {
    use crate::dao::pick_store::memory::MemoryPickStore;

    let state = AppState::new(AppConfig::default(), TokenKeys::from_secret(b"test-secret"));
    state
        .set_pick_store(Arc::new(MemoryPickStore::new()))
        .await;
    state
}
