//! Application state for the payroll adjustments API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ConfigLoader;
use crate::error::AdjustmentResult;
use crate::store::RecordStore;

/// Shared application state.
///
/// Holds the loaded configuration and the record store. Requests take the
/// store lock for the whole of their business transaction.
#[derive(Clone)]
pub struct AppState {
    /// The loaded configuration.
    config: Arc<ConfigLoader>,
    /// The records every handler operates on.
    store: Arc<Mutex<RecordStore>>,
}

impl AppState {
    /// Creates a new application state over an existing store.
    pub fn new(config: ConfigLoader, store: RecordStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Creates a state whose store is seeded with the configured catalog.
    pub fn seeded(config: ConfigLoader) -> AdjustmentResult<Self> {
        let mut store = RecordStore::new();
        config.seed_store(&mut store)?;
        Ok(Self::new(config, store))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared store.
    pub fn store(&self) -> &Mutex<RecordStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_clones_share_one_store() {
        let config = ConfigLoader::load("./config/default").unwrap();
        let state = AppState::new(config, RecordStore::new());
        let clone = state.clone();

        state.store().lock().await.allocate_id();
        assert_eq!(clone.store().lock().await.allocate_id(), 2);
    }
}
