//! Trivia — Fetch context.
//!
//! Turns a committed request list into a playable game, either through the
//! rate-limited remote service or by sampling the local store, and maps
//! remote identities onto local ones along the way.

pub mod application;
pub mod domain;

pub use application::orchestrator::{FetchDeps, FetchMode, fetch_new_game};
pub use application::reconciler::IdentityReconciler;
pub use domain::failure::{FetchFailure, FetchFailureKind};
pub use domain::game::{Game, GameDetail, GameQuestion};
