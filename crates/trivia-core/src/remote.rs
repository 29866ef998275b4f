//! Remote question service port.
//!
//! The remote service hands out session tokens, serves pages of random
//! questions and reports per-category counts. Every call answers with an
//! embedded response code; transport failures surface as `Err` instead.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::model::{CategoryCount, CategoryId, Difficulty, QuestionCount, QuestionFilter, QuestionKind};

/// Response code embedded in every remote answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCode {
    /// The call succeeded.
    Success,
    /// Not enough questions for the query.
    NoResults,
    /// The query contained an invalid argument.
    InvalidParameter,
    /// The session token does not exist.
    TokenNotFound,
    /// The session token has returned every question for the query.
    TokenEmpty,
    /// Too many requests from this client.
    RateLimit,
    /// A code this client does not understand.
    Unknown(u8),
}

impl ResponseCode {
    /// Returns `true` for `Success`.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == ResponseCode::Success
    }

    /// Numeric wire value.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            ResponseCode::Success => 0,
            ResponseCode::NoResults => 1,
            ResponseCode::InvalidParameter => 2,
            ResponseCode::TokenNotFound => 3,
            ResponseCode::TokenEmpty => 4,
            ResponseCode::RateLimit => 5,
            ResponseCode::Unknown(code) => code,
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimit,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({})", self.code())
    }
}

/// Session token that keeps the remote service from repeating questions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl SessionToken {
    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A question as delivered by the remote service, before reconciliation.
///
/// Remote questions carry no identifier and name their category instead of
/// referencing it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteQuestion {
    /// Category display name.
    pub category: String,
    /// Question difficulty.
    pub difficulty: Difficulty,
    /// Answer format.
    pub kind: QuestionKind,
    /// Question statement.
    pub text: String,
    /// The correct answer.
    pub correct_answer: String,
    /// The wrong answers.
    pub incorrect_answers: Vec<String>,
}

/// Port to the rate-limited remote question service.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Requests a fresh session token.
    async fn new_session_token(&self) -> Result<(ResponseCode, SessionToken), DomainError>;

    /// Requests `amount` questions matching `filter`.
    async fn fetch_questions(
        &self,
        amount: u32,
        filter: &QuestionFilter,
        token: &SessionToken,
    ) -> Result<(ResponseCode, Vec<RemoteQuestion>), DomainError>;

    /// Lists every remote category with its (provisional) total.
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, DomainError>;

    /// Fetches the exact per-difficulty breakdown for one category.
    async fn category_count(&self, category_id: CategoryId) -> Result<QuestionCount, DomainError>;
}
