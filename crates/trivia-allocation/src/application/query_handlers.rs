//! Allocation queries.
//!
//! All three queries are pure functions of an inventory snapshot and the
//! committed request list. The wildcard rules keep the committed wildcards of
//! a list to a single family (rows, columns, or one table-wide request), and
//! the list executes narrowest scope first, so a maximum computed as the
//! smallest remaining capacity over the enclosing scopes can always be
//! served.

use tracing::trace;
use trivia_core::model::{Category, CategoryId, Difficulty};
use trivia_inventory::QuestionInventory;

use crate::domain::capacity::remaining;
use crate::domain::committed::CommittedRequests;
use crate::domain::scope::Scope;

fn assert_queryable(inventory: &QuestionInventory, category: Option<&Category>) -> Option<CategoryId> {
    assert!(
        !inventory.is_empty(),
        "allocation queried against an empty inventory"
    );
    category.map(|category| {
        assert!(
            inventory.category(category.id).is_some(),
            "category {} ({}) is not part of the inventory",
            category.id,
            category.name
        );
        category.id
    })
}

/// Categories the user may still pick, the "any" category (`None`) first.
///
/// A category is dropped when it has no questions, when a request already
/// claims its whole row, or when none of its difficulties is still
/// choosable. "Any" is dropped as soon as any committed request leaves its
/// difficulty open.
///
/// # Panics
///
/// Panics if `inventory` has no entries.
#[must_use]
pub fn categories(inventory: &QuestionInventory, committed: &CommittedRequests) -> Vec<Option<Category>> {
    assert_queryable(inventory, None);

    let any_blocked = committed.iter().any(|s| s.difficulty.is_none());
    let any = (!any_blocked && !get_difficulties(inventory, committed, None).is_empty()).then_some(None);

    let concrete = inventory
        .categories()
        .filter(|category| {
            inventory.count(category.id).is_some_and(|count| count.total > 0)
                && !committed.contains_choice(Some(category.id), None)
                && !get_difficulties(inventory, committed, Some(category)).is_empty()
        })
        .cloned()
        .map(Some);

    let offered: Vec<Option<Category>> = any.into_iter().chain(concrete).collect();
    trace!(offered = offered.len(), "choosable categories");
    offered
}

/// Difficulties the user may still pick for `category`, "any" (`None`)
/// first.
///
/// A concrete difficulty is dropped when a request already claims its whole
/// column. "Any" is dropped as soon as any committed request leaves its
/// category open. Choices identical to a committed request, and choices
/// with nothing left to request, are never offered.
///
/// # Panics
///
/// Panics if `inventory` has no entries or `category` is not part of it.
#[must_use]
pub fn get_difficulties(
    inventory: &QuestionInventory,
    committed: &CommittedRequests,
    category: Option<&Category>,
) -> Vec<Option<Difficulty>> {
    let category_id = assert_queryable(inventory, category);

    let any_blocked = committed.iter().any(|s| s.category.is_none());
    let candidates = std::iter::once(None)
        .filter(|_| !any_blocked)
        .chain(
            Difficulty::ALL
                .into_iter()
                .filter(|d| !committed.contains_choice(None, Some(*d)))
                .map(Some),
        );

    candidates
        .filter(|difficulty| !committed.contains_choice(category_id, *difficulty))
        .filter(|difficulty| max_amount(inventory, committed, Scope::of(category_id, *difficulty)) > 0)
        .collect()
}

/// Largest amount that can still be requested for (`category`,
/// `difficulty`) without making the committed list unsatisfiable.
///
/// This is the smallest remaining capacity over the queried scope and every
/// scope enclosing it, where a scope's remaining capacity is its nominal
/// capacity minus the amounts of committed requests lying wholly inside it.
///
/// # Panics
///
/// Panics if `inventory` has no entries or `category` is not part of it.
#[must_use]
pub fn get_max_amount(
    inventory: &QuestionInventory,
    committed: &CommittedRequests,
    category: Option<&Category>,
    difficulty: Option<Difficulty>,
) -> u32 {
    let category_id = assert_queryable(inventory, category);
    max_amount(inventory, committed, Scope::of(category_id, difficulty))
}

fn max_amount(inventory: &QuestionInventory, committed: &CommittedRequests, scope: Scope) -> u32 {
    scope
        .enclosing()
        .into_iter()
        .map(|enclosing| remaining(inventory, committed, enclosing))
        .min()
        .unwrap_or(0)
}
