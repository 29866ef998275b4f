//! Inventory source contract.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use trivia_core::error::DomainError;
use trivia_core::model::{CategoryCount, CategoryId, QuestionCount};
use trivia_core::remote::RemoteService;
use trivia_core::repository::LocalStore;

/// Where inventory snapshots are read from.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Remote categories with provisional totals.
    async fn remote_snapshot(&self) -> Result<Vec<CategoryCount>, DomainError>;

    /// Exact breakdown for one remote category. Rate-limited remotely.
    async fn refine_count(&self, category_id: CategoryId) -> Result<QuestionCount, DomainError>;

    /// Authoritative local counts, current snapshot first.
    fn local_snapshot(&self) -> BoxStream<'static, Vec<CategoryCount>>;
}

/// `InventorySource` reading the remote side from a `RemoteService` and the
/// local side from a `LocalStore`.
#[derive(Clone)]
pub struct LiveInventorySource {
    remote: Arc<dyn RemoteService>,
    local: Arc<dyn LocalStore>,
}

impl LiveInventorySource {
    /// Creates a new live source.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteService>, local: Arc<dyn LocalStore>) -> Self {
        Self { remote, local }
    }
}

impl std::fmt::Debug for LiveInventorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveInventorySource").finish_non_exhaustive()
    }
}

#[async_trait]
impl InventorySource for LiveInventorySource {
    async fn remote_snapshot(&self) -> Result<Vec<CategoryCount>, DomainError> {
        self.remote.category_counts().await
    }

    async fn refine_count(&self, category_id: CategoryId) -> Result<QuestionCount, DomainError> {
        self.remote.category_count(category_id).await
    }

    fn local_snapshot(&self) -> BoxStream<'static, Vec<CategoryCount>> {
        self.local.category_counts()
    }
}
