//! Domain model for the Question Inventory context.

pub mod snapshot;
pub mod sync;
