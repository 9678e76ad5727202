//! Client builder

use crate::client::HealthClient;
use crate::config::ClientConfig;
use crate::store::HealthStore;
use std::sync::Arc;
use tracing::info;

/// Builder for [`HealthClient`]
///
/// The store collaborator is required up front; configuration is optional.
pub struct ClientBuilder {
    store: Arc<dyn HealthStore>,
    config: ClientConfig,
}

impl ClientBuilder {
    /// Start building a client over a store
    pub fn new<S: HealthStore>(store: S) -> Self {
        Self {
            store: Arc::new(store),
            config: ClientConfig::default(),
        }
    }

    /// Start building from an existing store handle
    ///
    /// Use this when the caller needs to retain its own reference to the
    /// store (for example a test harness inserting fixtures directly).
    pub fn from_arc(store: Arc<dyn HealthStore>) -> Self {
        Self {
            store,
            config: ClientConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Cap raw query result counts regardless of per-query limits
    pub fn max_raw_results(mut self, cap: usize) -> Self {
        self.config.max_raw_results = Some(cap);
        self
    }

    /// Build the client
    pub fn build(self) -> HealthClient {
        info!(max_raw_results = ?self.config.max_raw_results, "health client ready");
        HealthClient::from_parts(self.store, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_builder_defaults() {
        let client = ClientBuilder::new(MemoryStore::new()).build();
        assert_eq!(client.config().max_raw_results, None);
    }

    #[test]
    fn test_builder_shares_store_handle() {
        let store = Arc::new(MemoryStore::new());
        let _client = ClientBuilder::from_arc(store.clone()).max_raw_results(50).build();
        // The harness keeps its own handle for fixtures
        assert_eq!(store.count(&"stepCount".into()), 0);
    }
}
