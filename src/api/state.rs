//! Application state for the School Reports API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::RecordStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration and the record store reports are built from.
#[derive(Clone)]
pub struct AppState {
    /// The loaded school configuration.
    config: Arc<ConfigLoader>,
    /// Where record collections are fetched from.
    store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new<S: RecordStore + 'static>(config: ConfigLoader, store: S) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a shared handle to the record store.
    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }
}
