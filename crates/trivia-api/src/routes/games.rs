//! Routes for the Fetch context and stored games.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use trivia_allocation::CommittedRequests;
use trivia_core::error::DomainError;
use trivia_core::throttle::Throttle;
use trivia_fetch::{FetchDeps, FetchMode, Game, fetch_new_game};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, SourceKind};

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    /// Sample the local store instead of calling the remote service.
    #[serde(default)]
    pub offline: bool,
    /// The committed requests, in execution order.
    pub requests: CommittedRequests,
}

/// POST /
#[instrument(skip(state, request), fields(offline = request.offline, requests = request.requests.len()))]
async fn new_game(
    State(state): State<AppState>,
    Json(request): Json<NewGameRequest>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    if request.requests.is_empty() {
        return Err(DomainError::Validation("a game needs at least one request".to_owned()).into());
    }

    let (mode, source) = if request.offline {
        (FetchMode::Offline, SourceKind::Local)
    } else {
        (FetchMode::Online, SourceKind::Remote)
    };
    let inventory = state.inventory(source).await?;

    // Offline fetches never touch the remote service, so they do not queue
    // behind the shared throttle.
    let mut unthrottled;
    let mut shared;
    let throttle: &mut Throttle = if request.offline {
        unthrottled = Throttle::new(Duration::ZERO);
        &mut unthrottled
    } else {
        shared = state.throttle.lock().await;
        &mut shared
    };

    let deps = FetchDeps {
        remote: state.remote.as_ref(),
        store: state.store.as_ref(),
        inventory: &inventory,
        clock: state.clock.as_ref(),
        throttle,
    };
    let cancel = state.shutdown.child_token();
    let game = fetch_new_game(&request.requests, mode, deps, &cancel, |index| async move {
        debug!(index, "fetching request");
    })
    .await?;

    let saved = state.store.save_game(&game)?;
    info!(game_id = %saved.detail.id, questions = saved.len(), "game stored");

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /
async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    Ok(Json(state.store.games()?))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Game>, ApiError> {
    state
        .store
        .game(id)?
        .map(Json)
        .ok_or(ApiError::GameNotFound(id))
}

/// Returns the router for the games context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(new_game))
        .route("/{id}", get(get_game))
}
