//! Domain model for the Capacity Allocation context.

pub mod capacity;
pub mod committed;
pub mod scope;
