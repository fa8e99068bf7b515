//! Shared application state handed to every handler.

pub mod clock;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::store::Store, error::ServiceError};

pub use self::clock::{Clock, ManualClock, SystemClock};

/// Cheaply clonable handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state: the injected storage backend, clock and runtime settings.
pub struct AppState {
    store: RwLock<Option<Arc<dyn Store>>>,
    degraded: watch::Sender<bool>,
    clock: Arc<dyn Clock>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            clock,
            config,
        })
    }

    /// Construct a state with a storage backend already installed.
    pub fn with_store(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        store: Arc<dyn Store>,
    ) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            store: RwLock::new(Some(store)),
            degraded: degraded_tx,
            clock,
            config,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn Store>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn Store>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn Store>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
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

    /// Update the degraded flag, notifying watchers only when it changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Time source for record timestamps.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Runtime settings loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::store::MemoryStore;

    fn state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn starts_degraded_without_store() {
        let state = state();
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_and_clearing_store_toggles_degraded() {
        let state = state();
        let watcher = state.degraded_watcher();
        assert!(*watcher.borrow());

        state.set_store(Arc::new(MemoryStore::new())).await;
        assert!(!state.is_degraded());
        assert!(!*watcher.borrow());
        assert!(state.store().await.is_some());

        state.clear_store().await;
        assert!(state.is_degraded());
        assert!(*watcher.borrow());
        assert!(state.store().await.is_none());
    }

    #[test]
    fn clock_is_injected() {
        let at = SystemTime::UNIX_EPOCH;
        let state = AppState::new(AppConfig::default(), Arc::new(ManualClock::new(at)));
        assert_eq!(state.clock().now(), at);
    }
}
