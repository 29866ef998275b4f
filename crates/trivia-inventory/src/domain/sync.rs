//! Wholesale category refresh planning.
//!
//! When the remote category list is refreshed, the local category table is
//! brought in line with it. Remote categories are inserted or renamed in
//! place. A local category whose remote counterpart vanished keeps living
//! under a fresh negative id as long as it still owns questions; otherwise it
//! is dropped. A negative-id category whose name reappears remotely is moved
//! back onto the remote id.

use std::collections::HashSet;

use trivia_core::model::{Category, CategoryId};

/// Changes needed to bring the local category table in line with the remote
/// listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySyncPlan {
    /// Remote categories not yet stored locally.
    pub inserted: Vec<Category>,
    /// Stored categories whose remote name changed (same id, new name).
    pub renamed: Vec<Category>,
    /// Stored categories moving to a new id: `(old_id, category)`.
    pub rekeyed: Vec<(CategoryId, Category)>,
    /// Stored categories to delete.
    pub removed: Vec<CategoryId>,
}

impl CategorySyncPlan {
    /// Returns `true` if the local table is already in sync.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.inserted.is_empty()
            && self.renamed.is_empty()
            && self.rekeyed.is_empty()
            && self.removed.is_empty()
    }
}

/// Plans the category refresh.
///
/// `owning_questions` lists the ids of local categories that still have
/// stored questions.
#[must_use]
pub fn plan_category_sync(
    local: &[Category],
    remote: &[Category],
    owning_questions: &HashSet<CategoryId>,
) -> CategorySyncPlan {
    let mut plan = CategorySyncPlan::default();
    let remote_ids: HashSet<CategoryId> = remote.iter().map(|c| c.id).collect();
    let mut next_negative = local.iter().map(|c| c.id).min().unwrap_or(0).min(0) - 1;

    for category in remote {
        match local.iter().find(|l| l.id == category.id) {
            Some(existing) if existing.name != category.name => plan.renamed.push(category.clone()),
            Some(_) => {}
            None => {
                let orphan = local
                    .iter()
                    .find(|l| !l.is_remote_synced() && l.name == category.name);
                match orphan {
                    Some(orphan) => plan.rekeyed.push((orphan.id, category.clone())),
                    None => plan.inserted.push(category.clone()),
                }
            }
        }
    }

    for category in local.iter().filter(|c| c.is_remote_synced()) {
        if remote_ids.contains(&category.id) {
            continue;
        }
        if owning_questions.contains(&category.id) {
            plan.rekeyed
                .push((category.id, Category::new(next_negative, category.name.clone())));
            next_negative -= 1;
        } else {
            plan.removed.push(category.id);
        }
    }

    plan
}
