//! Application layer for the Fetch context.

pub mod orchestrator;
pub mod reconciler;
