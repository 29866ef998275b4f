//! Fetch orchestration.
//!
//! Online, the committed requests run as one sequential chain:
//! acquire a session token, then for every request throttle, fetch a page
//! and reconcile it. Offline, every request samples the local store while
//! excluding the questions earlier requests already picked. Either way the
//! first failure aborts the whole fetch.

use std::collections::HashSet;
use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use trivia_allocation::CommittedRequests;
use trivia_core::clock::Clock;
use trivia_core::error::DomainError;
use trivia_core::model::GameSetting;
use trivia_core::remote::{RemoteService, SessionToken};
use trivia_core::repository::LocalStore;
use trivia_core::throttle::Throttle;
use trivia_inventory::QuestionInventory;
use uuid::Uuid;

use crate::application::reconciler::IdentityReconciler;
use crate::domain::failure::{FetchFailure, FetchFailureKind};
use crate::domain::game::Game;

/// Where the questions of a game come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// The remote service, one throttled page per request.
    #[default]
    Online,
    /// The local store.
    Offline,
}

/// Collaborators of one fetch.
pub struct FetchDeps<'a> {
    /// Remote question service.
    pub remote: &'a dyn RemoteService,
    /// Local store, read for sampling and reconciliation.
    pub store: &'a dyn LocalStore,
    /// Inventory snapshot the requests were committed against.
    pub inventory: &'a QuestionInventory,
    /// Stamps the game.
    pub clock: &'a dyn Clock,
    /// Spaces remote page requests.
    pub throttle: &'a mut Throttle,
}

impl std::fmt::Debug for FetchDeps<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchDeps")
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

/// Executes `requests` in order and assembles the game.
///
/// `on_progress` is awaited with each request's index before that request
/// is processed. `cancel` is checked between requests; a cancelled fetch
/// fails with `FetchFailureKind::Cancelled`.
///
/// # Errors
///
/// Returns a `FetchFailure` carrying the first failure and the partial game
/// built up to it.
#[instrument(skip_all, fields(mode = ?mode, requests = requests.len()))]
pub async fn fetch_new_game<F, Fut>(
    requests: &CommittedRequests,
    mode: FetchMode,
    deps: FetchDeps<'_>,
    cancel: &CancellationToken,
    on_progress: F,
) -> Result<Game, FetchFailure>
where
    F: FnMut(usize) -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    let game = Game::new(Uuid::new_v4(), deps.clock.now());
    let result = match mode {
        FetchMode::Online => fetch_online(requests, deps, cancel, on_progress, game).await,
        FetchMode::Offline => fetch_offline(requests, deps.store, cancel, on_progress, game).await,
    };
    match &result {
        Ok(game) => info!(game_id = %game.detail.id, questions = game.len(), "game assembled"),
        Err(failure) => warn!(
            kind = %failure.kind,
            fetched = failure.partial.len(),
            "fetch aborted"
        ),
    }
    result
}

fn abort(kind: FetchFailureKind, partial: Game) -> Result<Game, FetchFailure> {
    Err(FetchFailure { kind, partial })
}

async fn fetch_online<F, Fut>(
    requests: &CommittedRequests,
    deps: FetchDeps<'_>,
    cancel: &CancellationToken,
    mut on_progress: F,
    mut game: Game,
) -> Result<Game, FetchFailure>
where
    F: FnMut(usize) -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    let FetchDeps {
        remote,
        store,
        inventory,
        throttle,
        ..
    } = deps;

    if cancel.is_cancelled() {
        return abort(FetchFailureKind::Cancelled, game);
    }
    let token = match remote.new_session_token().await {
        Ok((code, token)) => match FetchFailureKind::from_response(code, throttle.window()) {
            None => token,
            Some(kind) => return abort(kind, game),
        },
        Err(e) => return abort(FetchFailureKind::Transport(e.to_string()), game),
    };
    info!("session token acquired");

    let mut reconciler = IdentityReconciler::new(store, inventory);
    for (index, request) in requests.iter().enumerate() {
        on_progress(index).await;
        let waited = tokio::select! {
            biased;
            () = cancel.cancelled() => return abort(FetchFailureKind::Cancelled, game),
            waited = throttle.acquire() => waited,
        };
        debug!(index, ?waited, "throttle released");

        let fetched = fetch_page(
            index,
            request,
            remote,
            &token,
            throttle,
            &mut reconciler,
            &mut game,
        )
        .await;
        if let Err(kind) = fetched {
            return abort(kind, game);
        }
    }
    Ok(game)
}

#[instrument(
    skip(remote, token, throttle, reconciler, game),
    fields(category = ?request.category_id(), difficulty = ?request.difficulty, amount = request.amount)
)]
async fn fetch_page(
    index: usize,
    request: &GameSetting,
    remote: &dyn RemoteService,
    token: &SessionToken,
    throttle: &Throttle,
    reconciler: &mut IdentityReconciler<'_>,
    game: &mut Game,
) -> Result<(), FetchFailureKind> {
    let (code, page) = remote
        .fetch_questions(request.amount, &request.filter(), token)
        .await
        .map_err(|e| FetchFailureKind::Transport(e.to_string()))?;
    if let Some(kind) = FetchFailureKind::from_response(code, throttle.window()) {
        return Err(kind);
    }
    if page.len() < request.amount as usize {
        warn!(received = page.len(), "page shorter than requested");
        return Err(FetchFailureKind::NoResults);
    }

    let mut questions = Vec::with_capacity(page.len());
    for remote_question in page {
        let question = reconciler
            .question(remote_question)
            .await
            .map_err(|e| FetchFailureKind::Storage(e.to_string()))?;
        questions.push(question);
    }
    info!(received = questions.len(), "page fetched");
    game.extend(questions);
    Ok(())
}

async fn fetch_offline<F, Fut>(
    requests: &CommittedRequests,
    store: &dyn LocalStore,
    cancel: &CancellationToken,
    mut on_progress: F,
    mut game: Game,
) -> Result<Game, FetchFailure>
where
    F: FnMut(usize) -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    let mut picked = HashSet::new();
    for (index, request) in requests.iter().enumerate() {
        on_progress(index).await;
        if cancel.is_cancelled() {
            return abort(FetchFailureKind::Cancelled, game);
        }

        let sample = match store
            .sample_questions(&request.filter(), request.amount, &picked)
            .await
        {
            Ok(sample) if sample.len() == request.amount as usize => sample,
            Ok(short) => {
                let available = u32::try_from(short.len()).unwrap_or(u32::MAX);
                return abort(
                    FetchFailureKind::LocalSupplyExhausted {
                        request_index: index,
                        requested: request.amount,
                        available,
                    },
                    game,
                );
            }
            Err(DomainError::InsufficientQuestions {
                requested,
                available,
            }) => {
                return abort(
                    FetchFailureKind::LocalSupplyExhausted {
                        request_index: index,
                        requested,
                        available,
                    },
                    game,
                );
            }
            Err(e) => return abort(FetchFailureKind::Storage(e.to_string()), game),
        };
        debug!(index, sampled = sample.len(), "request sampled");
        picked.extend(sample.iter().map(|q| q.id));
        game.extend(sample);
    }
    Ok(game)
}
