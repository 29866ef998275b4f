//! Trivia API — library root.
//!
//! Exposes the router and its building blocks so integration tests can
//! assemble the same application as the binary.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/inventory", routes::inventory::router())
        .nest("/api/v1/allocation", routes::allocation::router())
        .nest("/api/v1/games", routes::games::router())
        .with_state(state)
}
