//! Shared application state.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use trivia_core::clock::Clock;
use trivia_core::remote::RemoteService;
use trivia_core::throttle::Throttle;
use trivia_inventory::application::refresh::{current_local_inventory, refresh_remote_inventory};
use trivia_inventory::{LiveInventorySource, QuestionInventory};
use trivia_store::MemoryStore;

use crate::error::ApiError;

/// Which inventory snapshot a request works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Counts reported by the remote service.
    Remote,
    /// Counts derived from the local store.
    #[default]
    Local,
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Local question and game store.
    pub store: Arc<MemoryStore>,
    /// Remote question service.
    pub remote: Arc<dyn RemoteService>,
    /// Clock used to stamp games.
    pub clock: Arc<dyn Clock>,
    /// Cached remote inventory, replaced on refresh.
    pub remote_inventory: Arc<RwLock<Option<QuestionInventory>>>,
    /// One throttle for every remote question request of the process.
    pub throttle: Arc<Mutex<Throttle>>,
    /// Cancelled on shutdown; fetches run on child tokens.
    pub shutdown: CancellationToken,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        remote: Arc<dyn RemoteService>,
        clock: Arc<dyn Clock>,
        throttle: Throttle,
    ) -> Self {
        Self {
            store,
            remote,
            clock,
            remote_inventory: Arc::new(RwLock::new(None)),
            throttle: Arc::new(Mutex::new(throttle)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Inventory source over the remote service and the store.
    #[must_use]
    pub fn inventory_source(&self) -> LiveInventorySource {
        LiveInventorySource::new(Arc::clone(&self.remote), self.store.clone())
    }

    /// The current snapshot of `source`. The remote snapshot is loaded on
    /// first use and cached until the next refresh.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the snapshot cannot be loaded.
    pub async fn inventory(&self, source: SourceKind) -> Result<QuestionInventory, ApiError> {
        match source {
            SourceKind::Local => Ok(current_local_inventory(&self.inventory_source()).await?),
            SourceKind::Remote => {
                if let Some(cached) = self.remote_inventory.read().await.clone() {
                    return Ok(cached);
                }
                let mut cache = self.remote_inventory.write().await;
                if let Some(cached) = cache.clone() {
                    return Ok(cached);
                }
                let loaded = refresh_remote_inventory(&self.inventory_source()).await?;
                *cache = Some(loaded.clone());
                Ok(loaded)
            }
        }
    }
}
