use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::ranking_store::RankingStore, error::ServiceError};

pub type SharedState = Arc<AppState>;

/// Central application state: configuration plus the currently installed ranking store.
pub struct AppState {
    config: AppConfig,
    ranking_store: RwLock<Option<Arc<dyn RankingStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            ranking_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Construct a state with `store` already installed (not degraded).
    pub async fn with_store(config: AppConfig, store: Arc<dyn RankingStore>) -> SharedState {
        let state = Self::new(config);
        state.set_ranking_store(store).await;
        state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current ranking store, if one is installed.
    pub async fn ranking_store(&self) -> Option<Arc<dyn RankingStore>> {
        let guard = self.ranking_store.read().await;
        guard.as_ref().cloned()
    }

    /// Return the ranking store, or [`ServiceError::Degraded`] while storage is unavailable.
    pub async fn require_ranking_store(&self) -> Result<Arc<dyn RankingStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.ranking_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new ranking store implementation and leave degraded mode.
    pub async fn set_ranking_store(&self, store: Arc<dyn RankingStore>) {
        {
            let mut guard = self.ranking_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current ranking store and enter degraded mode.
    pub async fn clear_ranking_store(&self) {
        {
            let mut guard = self.ranking_store.write().await;
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
    use crate::dao::ranking_store::MemoryRankingStore;

    #[tokio::test]
    async fn starts_degraded_without_store() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_ranking_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_and_clearing_store_toggles_degraded() {
        let state = AppState::new(AppConfig::default());
        let mut watcher = state.degraded_watcher();

        state
            .set_ranking_store(Arc::new(MemoryRankingStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(state.require_ranking_store().await.is_ok());

        state.clear_ranking_store().await;
        assert!(state.is_degraded());
        assert!(state.ranking_store().await.is_none());
    }

    #[tokio::test]
    async fn degraded_flag_hides_installed_store() {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(MemoryRankingStore::new())).await;
        state.update_degraded(true);
        assert!(state.require_ranking_store().await.is_err());
        assert!(state.ranking_store().await.is_some());
    }
}
