//! Routes for the Question Inventory context.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use trivia_core::model::{Category, CategoryId};
use trivia_inventory::QuestionInventory;
use trivia_inventory::application::refresh::{refine_all, refresh_remote_inventory};

use crate::error::ApiError;
use crate::state::{AppState, SourceKind};

/// Query string for GET /.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    /// Snapshot to read, local by default.
    #[serde(default)]
    pub source: SourceKind,
}

/// Request body for POST /refresh.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// Also fetch the exact per-difficulty breakdown of every category.
    #[serde(default)]
    pub refine: bool,
}

/// Response body for POST /refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// The new remote snapshot.
    pub inventory: QuestionInventory,
    /// Remote categories newly stored locally.
    pub inserted: Vec<Category>,
    /// Stored categories that took a new remote name.
    pub renamed: Vec<Category>,
    /// Stored categories kept under a fresh local id.
    pub rekeyed: Vec<Category>,
    /// Ids of stored categories dropped.
    pub removed: Vec<CategoryId>,
}

/// GET /
#[instrument(skip(state))]
async fn get_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<QuestionInventory>, ApiError> {
    Ok(Json(state.inventory(query.source).await?))
}

/// POST /refresh
#[instrument(skip(state, request), fields(refine = request.refine))]
async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let source = state.inventory_source();
    let mut inventory = refresh_remote_inventory(&source).await?;

    let remote: Vec<Category> = inventory.categories().cloned().collect();
    let plan = state.store.sync_categories(&remote)?;

    if request.refine {
        let mut throttle = state.throttle.lock().await;
        inventory = refine_all(&inventory, &source, &mut throttle).await?;
    }

    *state.remote_inventory.write().await = Some(inventory.clone());
    info!(categories = inventory.entries().len(), "remote inventory cached");

    Ok(Json(RefreshResponse {
        inventory,
        inserted: plan.inserted,
        renamed: plan.renamed,
        rekeyed: plan.rekeyed.into_iter().map(|(_, category)| category).collect(),
        removed: plan.removed,
    }))
}

/// Returns the router for the inventory context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_inventory))
        .route("/refresh", post(refresh))
}
