//! Inventory refresh operations.
//!
//! These produce new `QuestionInventory` snapshots; none of them modifies a
//! snapshot a caller already holds.

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tracing::{debug, info, instrument, warn};
use trivia_core::error::DomainError;
use trivia_core::model::CategoryId;
use trivia_core::throttle::Throttle;

use crate::application::source::InventorySource;
use crate::domain::snapshot::QuestionInventory;

/// Loads a fresh remote snapshot. Counts are provisional until refined.
///
/// # Errors
///
/// Returns `DomainError` if the remote listing fails.
#[instrument(skip(source))]
pub async fn refresh_remote_inventory(
    source: &dyn InventorySource,
) -> Result<QuestionInventory, DomainError> {
    let entries = source.remote_snapshot().await?;
    info!(categories = entries.len(), "remote inventory refreshed");
    Ok(QuestionInventory::remote(entries))
}

/// Returns a copy of `inventory` with the breakdown of one category refined.
///
/// # Errors
///
/// Returns `DomainError::CategoryNotFound` if the category is not part of the
/// snapshot, or the source's error if the refinement call fails.
#[instrument(skip(inventory, source))]
pub async fn refine_category(
    inventory: &QuestionInventory,
    source: &dyn InventorySource,
    category_id: CategoryId,
) -> Result<QuestionInventory, DomainError> {
    if inventory.category(category_id).is_none() {
        return Err(DomainError::CategoryNotFound(category_id));
    }
    let count = source.refine_count(category_id).await?;
    if !count.is_authoritative() {
        warn!(?count, "refined count breakdown does not add up to its total");
    }
    inventory.with_count(category_id, count)
}

/// Refines every provisional category, one throttled call at a time.
///
/// # Errors
///
/// Stops at and returns the first refinement error.
#[instrument(skip_all)]
pub async fn refine_all(
    inventory: &QuestionInventory,
    source: &dyn InventorySource,
    throttle: &mut Throttle,
) -> Result<QuestionInventory, DomainError> {
    let mut refined = inventory.clone();
    for category_id in inventory.provisional_categories() {
        let waited = throttle.acquire().await;
        debug!(category_id, ?waited, "refining category");
        refined = refine_category(&refined, source, category_id).await?;
    }
    Ok(refined)
}

/// Stream of local snapshots, current one first.
#[must_use]
pub fn watch_local_inventory(source: &dyn InventorySource) -> BoxStream<'static, QuestionInventory> {
    source.local_snapshot().map(QuestionInventory::local).boxed()
}

/// The current local snapshot.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the local stream ends without
/// yielding a snapshot.
pub async fn current_local_inventory(
    source: &dyn InventorySource,
) -> Result<QuestionInventory, DomainError> {
    watch_local_inventory(source)
        .next()
        .await
        .ok_or_else(|| DomainError::Infrastructure("local inventory stream closed".to_owned()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures_util::stream;
    use trivia_core::model::{Category, CategoryCount, QuestionCount};

    use super::*;
    use crate::domain::snapshot::InventoryOrigin;

    #[derive(Debug, Default)]
    struct StubSource {
        remote: Vec<CategoryCount>,
        local: Vec<Vec<CategoryCount>>,
        refined: Vec<(CategoryId, QuestionCount)>,
        refine_calls: Mutex<Vec<CategoryId>>,
    }

    #[async_trait]
    impl InventorySource for StubSource {
        async fn remote_snapshot(&self) -> Result<Vec<CategoryCount>, DomainError> {
            Ok(self.remote.clone())
        }

        async fn refine_count(&self, category_id: CategoryId) -> Result<QuestionCount, DomainError> {
            self.refine_calls.lock().unwrap().push(category_id);
            self.refined
                .iter()
                .find(|(id, _)| *id == category_id)
                .map(|(_, count)| *count)
                .ok_or_else(|| DomainError::Infrastructure("refinement unavailable".into()))
        }

        fn local_snapshot(&self) -> BoxStream<'static, Vec<CategoryCount>> {
            stream::iter(self.local.clone()).boxed()
        }
    }

    fn entry(id: CategoryId, name: &str, count: QuestionCount) -> CategoryCount {
        CategoryCount {
            category: Category::new(id, name),
            count,
        }
    }

    #[tokio::test]
    async fn test_refresh_remote_inventory_marks_origin_remote() {
        // Arrange
        let source = StubSource {
            remote: vec![entry(9, "General Knowledge", QuestionCount::provisional(300))],
            ..StubSource::default()
        };

        // Act
        let inventory = refresh_remote_inventory(&source).await.unwrap();

        // Assert
        assert_eq!(inventory.origin(), InventoryOrigin::Remote);
        assert_eq!(inventory.provisional_categories(), vec![9]);
    }

    #[tokio::test]
    async fn test_refine_category_rejects_unlisted_category_without_remote_call() {
        // Arrange
        let source = StubSource::default();
        let inventory = QuestionInventory::remote(vec![]);

        // Act
        let result = refine_category(&inventory, &source, 12).await;

        // Assert
        assert!(matches!(result, Err(DomainError::CategoryNotFound(12))));
        assert!(source.refine_calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refine_all_refines_only_provisional_categories_with_throttle() {
        // Arrange
        let source = StubSource {
            refined: vec![
                (9, QuestionCount::from_breakdown(100, 120, 80)),
                (11, QuestionCount::from_breakdown(40, 50, 30)),
            ],
            ..StubSource::default()
        };
        let inventory = QuestionInventory::remote(vec![
            entry(9, "General Knowledge", QuestionCount::provisional(300)),
            entry(10, "Books", QuestionCount::from_breakdown(30, 40, 20)),
            entry(11, "Film", QuestionCount::provisional(120)),
        ]);
        let mut throttle = Throttle::new(Duration::from_secs(6));
        let start = tokio::time::Instant::now();

        // Act
        let refined = refine_all(&inventory, &source, &mut throttle).await.unwrap();

        // Assert
        assert_eq!(*source.refine_calls.lock().unwrap(), vec![9, 11]);
        assert!(refined.provisional_categories().is_empty());
        assert_eq!(refined.count(10), inventory.count(10));
        assert!(start.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_refine_all_propagates_first_failure() {
        // Arrange
        let source = StubSource::default();
        let inventory =
            QuestionInventory::remote(vec![entry(9, "General Knowledge", QuestionCount::provisional(3))]);
        let mut throttle = Throttle::default();

        // Act
        let result = refine_all(&inventory, &source, &mut throttle).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_watch_local_inventory_yields_local_snapshots_in_order() {
        // Arrange
        let source = StubSource {
            local: vec![
                vec![entry(9, "General Knowledge", QuestionCount::from_breakdown(1, 0, 0))],
                vec![entry(9, "General Knowledge", QuestionCount::from_breakdown(2, 0, 0))],
            ],
            ..StubSource::default()
        };

        // Act
        let snapshots: Vec<QuestionInventory> = watch_local_inventory(&source).collect().await;

        // Assert
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots.iter().all(|s| s.origin() == InventoryOrigin::Local));
        assert_eq!(snapshots[1].total(None), 2);
    }

    #[tokio::test]
    async fn test_current_local_inventory_fails_on_closed_stream() {
        let source = StubSource::default();

        let result = current_local_inventory(&source).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
