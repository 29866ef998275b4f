//! Routes for the Capacity Allocation context.
//!
//! The allocator treats an empty inventory or an unknown category as a
//! programming error, so every handler checks both before querying it.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use trivia_allocation::{CommittedRequests, categories, get_difficulties, get_max_amount};
use trivia_core::error::DomainError;
use trivia_core::model::{Category, CategoryId, Difficulty, GameSetting};
use trivia_inventory::QuestionInventory;

use crate::error::ApiError;
use crate::state::{AppState, SourceKind};

/// Request body shared by every allocation query.
#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    /// Work against the local inventory instead of the remote one.
    #[serde(default)]
    pub offline: bool,
    /// Requests the user already added.
    #[serde(default)]
    pub committed: CommittedRequests,
    /// Category of the choice being edited, or any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Difficulty of the choice being edited, or any.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Request body for POST /commit.
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    /// Work against the local inventory instead of the remote one.
    #[serde(default)]
    pub offline: bool,
    /// Requests the user already added.
    #[serde(default)]
    pub committed: CommittedRequests,
    /// Category of the new request, or any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Difficulty of the new request, or any.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Number of questions requested.
    pub amount: u32,
}

/// Response body for POST /categories.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    /// Choosable categories; `null` stands for any category.
    pub categories: Vec<Option<Category>>,
}

/// Response body for POST /difficulties.
#[derive(Debug, Serialize)]
pub struct DifficultiesResponse {
    /// Choosable difficulties; `null` stands for any difficulty.
    pub difficulties: Vec<Option<Difficulty>>,
}

/// Response body for POST /max-amount.
#[derive(Debug, Serialize)]
pub struct MaxAmountResponse {
    /// Largest amount that keeps the request list satisfiable.
    pub max_amount: u32,
}

/// Response body for POST /commit.
#[derive(Debug, Serialize)]
pub struct CommitResponse {
    /// The updated request list, in execution order.
    pub committed: CommittedRequests,
    /// Position of the new request in the list.
    pub position: usize,
}

fn source_of(offline: bool) -> SourceKind {
    if offline { SourceKind::Local } else { SourceKind::Remote }
}

async fn queryable_inventory(state: &AppState, offline: bool) -> Result<QuestionInventory, ApiError> {
    let inventory = state.inventory(source_of(offline)).await?;
    if inventory.is_empty() {
        return Err(ApiError::EmptyInventory);
    }
    Ok(inventory)
}

fn resolve_category(
    inventory: &QuestionInventory,
    category_id: Option<CategoryId>,
) -> Result<Option<Category>, ApiError> {
    category_id
        .map(|id| {
            inventory
                .category(id)
                .cloned()
                .ok_or(ApiError::Domain(DomainError::CategoryNotFound(id)))
        })
        .transpose()
}

/// POST /categories
#[instrument(skip(state, request), fields(offline = request.offline, committed = request.committed.len()))]
async fn list_categories(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let inventory = queryable_inventory(&state, request.offline).await?;
    Ok(Json(CategoriesResponse {
        categories: categories(&inventory, &request.committed),
    }))
}

/// POST /difficulties
#[instrument(skip(state, request), fields(offline = request.offline, category_id = ?request.category_id))]
async fn list_difficulties(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<DifficultiesResponse>, ApiError> {
    let inventory = queryable_inventory(&state, request.offline).await?;
    let category = resolve_category(&inventory, request.category_id)?;
    Ok(Json(DifficultiesResponse {
        difficulties: get_difficulties(&inventory, &request.committed, category.as_ref()),
    }))
}

/// POST /max-amount
#[instrument(
    skip(state, request),
    fields(offline = request.offline, category_id = ?request.category_id, difficulty = ?request.difficulty)
)]
async fn max_amount(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<MaxAmountResponse>, ApiError> {
    let inventory = queryable_inventory(&state, request.offline).await?;
    let category = resolve_category(&inventory, request.category_id)?;
    Ok(Json(MaxAmountResponse {
        max_amount: get_max_amount(
            &inventory,
            &request.committed,
            category.as_ref(),
            request.difficulty,
        ),
    }))
}

/// POST /commit
#[instrument(
    skip(state, request),
    fields(category_id = ?request.category_id, difficulty = ?request.difficulty, amount = request.amount)
)]
async fn commit(
    State(state): State<AppState>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, ApiError> {
    let inventory = queryable_inventory(&state, request.offline).await?;
    let category = resolve_category(&inventory, request.category_id)?;

    let offered = categories(&inventory, &request.committed).contains(&category)
        && get_difficulties(&inventory, &request.committed, category.as_ref())
            .contains(&request.difficulty);
    if !offered {
        return Err(DomainError::Validation(format!(
            "choice (category {:?}, difficulty {:?}) is not available",
            request.category_id, request.difficulty
        ))
        .into());
    }
    let max = get_max_amount(
        &inventory,
        &request.committed,
        category.as_ref(),
        request.difficulty,
    );
    if request.amount > max {
        return Err(DomainError::Validation(format!(
            "requested {} questions, at most {max} can be added",
            request.amount
        ))
        .into());
    }

    let mut committed = request.committed;
    let position = committed.commit(GameSetting::new(category, request.difficulty, request.amount)?)?;
    info!(position, total = committed.total_amount(), "request committed");

    Ok(Json(CommitResponse { committed, position }))
}

/// Returns the router for the allocation context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(list_categories))
        .route("/difficulties", post(list_difficulties))
        .route("/max-amount", post(max_amount))
        .route("/commit", post(commit))
}
