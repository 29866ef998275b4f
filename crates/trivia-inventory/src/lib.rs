//! Trivia — Question Inventory context.
//!
//! Responsible for the per-category question counts the allocator works
//! from: remote snapshots (provisional until refined), locally derived
//! snapshots, and the wholesale category refresh.

pub mod application;
pub mod domain;

pub use application::source::{InventorySource, LiveInventorySource};
pub use domain::snapshot::{InventoryOrigin, QuestionInventory};
pub use domain::sync::{CategorySyncPlan, plan_category_sync};
