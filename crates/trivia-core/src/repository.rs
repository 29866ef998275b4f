//! Local question store port.

use std::collections::HashSet;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::DomainError;
use crate::model::{Category, CategoryCount, CategoryId, Question, QuestionFilter, QuestionId};

/// Read side of local persistent storage as seen by inventory and fetch.
///
/// Writes (saving questions and games) live on the store implementation.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Randomly samples exactly `amount` questions matching `filter`,
    /// never returning an id contained in `excluding`.
    ///
    /// Fails with `DomainError::InsufficientQuestions` when fewer than
    /// `amount` questions qualify.
    async fn sample_questions(
        &self,
        filter: &QuestionFilter,
        amount: u32,
        excluding: &HashSet<QuestionId>,
    ) -> Result<Vec<Question>, DomainError>;

    /// Finds a persisted category by exact name.
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;

    /// Finds a persisted question by exact statement.
    async fn find_question_by_text(&self, text: &str) -> Result<Option<Question>, DomainError>;

    /// Highest question id in use, if any question is stored.
    async fn max_question_id(&self) -> Result<Option<QuestionId>, DomainError>;

    /// Lowest category id in use, if any category is stored.
    async fn min_category_id(&self) -> Result<Option<CategoryId>, DomainError>;

    /// Stream of authoritative per-category counts. Yields the current
    /// snapshot first, then a new one after every change.
    fn category_counts(&self) -> BoxStream<'static, Vec<CategoryCount>>;
}
