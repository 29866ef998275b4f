//! Question inventory snapshots.

use serde::{Deserialize, Serialize};
use trivia_core::error::DomainError;
use trivia_core::model::{Category, CategoryCount, CategoryId, Difficulty, QuestionCount};

/// Where an inventory snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryOrigin {
    /// Counts reported by the remote service.
    Remote,
    /// Counts derived from locally stored questions.
    Local,
}

/// Read-only view of available question counts, one entry per category.
///
/// A snapshot is never mutated in place; refinement produces a new snapshot
/// so that in-flight allocator queries and fetches keep the one they started
/// with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInventory {
    origin: InventoryOrigin,
    entries: Vec<CategoryCount>,
}

impl QuestionInventory {
    /// Creates a snapshot. Later entries for an already present category id
    /// are dropped.
    #[must_use]
    pub fn new(origin: InventoryOrigin, entries: Vec<CategoryCount>) -> Self {
        let mut deduped: Vec<CategoryCount> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !deduped.iter().any(|e| e.category.id == entry.category.id) {
                deduped.push(entry);
            }
        }
        Self {
            origin,
            entries: deduped,
        }
    }

    /// Snapshot built from remote counts.
    #[must_use]
    pub fn remote(entries: Vec<CategoryCount>) -> Self {
        Self::new(InventoryOrigin::Remote, entries)
    }

    /// Snapshot built from local counts.
    #[must_use]
    pub fn local(entries: Vec<CategoryCount>) -> Self {
        Self::new(InventoryOrigin::Local, entries)
    }

    /// The snapshot's origin.
    #[must_use]
    pub fn origin(&self) -> InventoryOrigin {
        self.origin
    }

    /// All entries, in listing order.
    #[must_use]
    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    /// Returns `true` if the snapshot lists no category.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every listed category.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|e| &e.category)
    }

    /// Looks a category up by id.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.entry(id).map(|e| &e.category)
    }

    /// Looks a category up by exact name.
    #[must_use]
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories().find(|c| c.name == name)
    }

    /// Counts for one category.
    #[must_use]
    pub fn count(&self, id: CategoryId) -> Option<QuestionCount> {
        self.entry(id).map(|e| e.count)
    }

    /// Sum over all categories for one difficulty, or of the totals when
    /// `difficulty` is `None`.
    #[must_use]
    pub fn total(&self, difficulty: Option<Difficulty>) -> u32 {
        self.entries.iter().map(|e| e.count.get(difficulty)).sum()
    }

    /// Ids of categories whose counts still lack a breakdown.
    #[must_use]
    pub fn provisional_categories(&self) -> Vec<CategoryId> {
        self.entries
            .iter()
            .filter(|e| !e.count.is_authoritative())
            .map(|e| e.category.id)
            .collect()
    }

    /// Returns a new snapshot with the counts of `id` replaced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CategoryNotFound` if the category is not listed.
    pub fn with_count(&self, id: CategoryId, count: QuestionCount) -> Result<Self, DomainError> {
        let mut next = self.clone();
        let entry = next
            .entries
            .iter_mut()
            .find(|e| e.category.id == id)
            .ok_or(DomainError::CategoryNotFound(id))?;
        entry.count = count;
        Ok(next)
    }

    fn entry(&self, id: CategoryId) -> Option<&CategoryCount> {
        self.entries.iter().find(|e| e.category.id == id)
    }
}
