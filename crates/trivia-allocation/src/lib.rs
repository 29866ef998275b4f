//! Trivia — Capacity Allocation context.
//!
//! Decides which (category, difficulty) choices a user may still add to a
//! multi-part game request, and how many questions each may ask for, so that
//! the committed request list can always be fetched.

pub mod application;
pub mod domain;

pub use application::query_handlers::{categories, get_difficulties, get_max_amount};
pub use domain::committed::CommittedRequests;
pub use domain::scope::Scope;
