//! Scope capacities.

use trivia_inventory::QuestionInventory;

use super::committed::CommittedRequests;
use super::scope::Scope;

/// Nominal number of questions the inventory holds inside `scope`.
///
/// A row of an unlisted category has capacity 0.
#[must_use]
pub fn capacity(inventory: &QuestionInventory, scope: Scope) -> u32 {
    match scope {
        Scope::Cell {
            category,
            difficulty,
        } => inventory
            .count(category)
            .map_or(0, |count| count.get(Some(difficulty))),
        Scope::Row { category } => inventory.count(category).map_or(0, |count| count.total),
        Scope::Column { difficulty } => inventory.total(Some(difficulty)),
        Scope::Table => inventory.total(None),
    }
}

/// Total amount committed by requests drawing only from inside `scope`.
#[must_use]
pub fn held(committed: &CommittedRequests, scope: Scope) -> u64 {
    committed
        .iter()
        .filter(|setting| scope.contains(Scope::of_setting(setting)))
        .map(|setting| u64::from(setting.amount))
        .sum()
}

/// Capacity of `scope` left once the requests inside it are served.
#[must_use]
pub fn remaining(inventory: &QuestionInventory, committed: &CommittedRequests, scope: Scope) -> u32 {
    let left = u64::from(capacity(inventory, scope)).saturating_sub(held(committed, scope));
    u32::try_from(left).unwrap_or(u32::MAX)
}
