//! Fetch failure taxonomy.

use std::time::Duration;

use thiserror::Error;
use trivia_core::remote::ResponseCode;

use super::game::Game;

/// Why a fetch was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailureKind {
    /// The remote service rejected a call for exceeding its rate limit.
    #[error("rate limited, retry after {} s", retry_after.as_secs())]
    RateLimited {
        /// How long to wait before retrying.
        retry_after: Duration,
    },

    /// The remote service holds too few questions for a request.
    #[error("the remote service has too few questions for the request")]
    NoResults,

    /// The remote service rejected a request's parameters.
    #[error("the remote service rejected the request parameters")]
    InvalidParameter,

    /// The session token expired or never existed.
    #[error("session token not found")]
    TokenNotFound,

    /// The session token has already served every matching question.
    #[error("session token exhausted")]
    TokenEmpty,

    /// The remote service answered with a code this client does not know.
    #[error("unknown remote response code {0}")]
    UnknownResponse(u8),

    /// The local store holds too few unused questions for a request.
    #[error(
        "request #{request_index} asked for {requested} questions, only {available} are available locally"
    )]
    LocalSupplyExhausted {
        /// Position of the failing request in the committed list.
        request_index: usize,
        /// Amount the request asked for.
        requested: u32,
        /// Matching questions that were still unused.
        available: u32,
    },

    /// The remote call did not complete.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A local store lookup failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// The caller cancelled the fetch.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchFailureKind {
    /// Maps a non-success response code to a failure. Returns `None` for
    /// `Success`.
    #[must_use]
    pub fn from_response(code: ResponseCode, retry_after: Duration) -> Option<Self> {
        match code {
            ResponseCode::Success => None,
            ResponseCode::NoResults => Some(Self::NoResults),
            ResponseCode::InvalidParameter => Some(Self::InvalidParameter),
            ResponseCode::TokenNotFound => Some(Self::TokenNotFound),
            ResponseCode::TokenEmpty => Some(Self::TokenEmpty),
            ResponseCode::RateLimit => Some(Self::RateLimited { retry_after }),
            ResponseCode::Unknown(code) => Some(Self::UnknownResponse(code)),
        }
    }

    /// Returns `true` when repeating the same fetch unchanged may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::TokenNotFound
                | Self::TokenEmpty
                | Self::Transport(_)
                | Self::Cancelled
        )
    }

    /// Returns `true` when the user should lower a request's amount instead
    /// of retrying.
    #[must_use]
    pub fn suggests_reducing_request(&self) -> bool {
        matches!(self, Self::NoResults | Self::LocalSupplyExhausted { .. })
    }
}

/// An aborted fetch: the reason, and the questions gathered before it.
///
/// The partial game is for diagnostics only and must not be saved or shown.
#[derive(Debug, Clone, Error)]
#[error("fetch aborted after {} questions: {kind}", partial.len())]
pub struct FetchFailure {
    /// Why the fetch stopped.
    pub kind: FetchFailureKind,
    /// Whatever was assembled before the failure.
    pub partial: Game,
}
