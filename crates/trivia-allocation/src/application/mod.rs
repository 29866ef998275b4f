//! Application queries for the Capacity Allocation context.

pub mod query_handlers;
