//! Test local stores.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use trivia_core::error::DomainError;
use trivia_core::model::{Category, CategoryCount, CategoryId, Question, QuestionCount, QuestionFilter, QuestionId};
use trivia_core::repository::LocalStore;

/// A read-only store over a fixed question list.
///
/// Sampling is deterministic: it returns the first matching questions in
/// list order.
#[derive(Debug, Default)]
pub struct StaticLocalStore {
    questions: Vec<Question>,
}

impl StaticLocalStore {
    /// Creates a store holding `questions`. Categories are taken from the
    /// questions.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    fn counts(&self) -> Vec<CategoryCount> {
        let mut by_category: BTreeMap<CategoryId, (Category, [u32; 3])> = BTreeMap::new();
        for question in &self.questions {
            let entry = by_category
                .entry(question.category.id)
                .or_insert_with(|| (question.category.clone(), [0; 3]));
            entry.1[question.difficulty as usize] += 1;
        }
        by_category
            .into_values()
            .map(|(category, [easy, medium, hard])| CategoryCount {
                category,
                count: QuestionCount::from_breakdown(easy, medium, hard),
            })
            .collect()
    }
}

#[async_trait]
impl LocalStore for StaticLocalStore {
    async fn sample_questions(
        &self,
        filter: &QuestionFilter,
        amount: u32,
        excluding: &HashSet<QuestionId>,
    ) -> Result<Vec<Question>, DomainError> {
        let matching: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| filter.matches(q) && !excluding.contains(&q.id))
            .cloned()
            .collect();
        if matching.len() < amount as usize {
            return Err(DomainError::InsufficientQuestions {
                requested: amount,
                available: u32::try_from(matching.len()).unwrap_or(u32::MAX),
            });
        }
        Ok(matching.into_iter().take(amount as usize).collect())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .questions
            .iter()
            .map(|q| &q.category)
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_question_by_text(&self, text: &str) -> Result<Option<Question>, DomainError> {
        Ok(self.questions.iter().find(|q| q.text == text).cloned())
    }

    async fn max_question_id(&self) -> Result<Option<QuestionId>, DomainError> {
        Ok(self.questions.iter().map(|q| q.id).max())
    }

    async fn min_category_id(&self) -> Result<Option<CategoryId>, DomainError> {
        Ok(self.questions.iter().map(|q| q.category.id).min())
    }

    fn category_counts(&self) -> BoxStream<'static, Vec<CategoryCount>> {
        stream::iter([self.counts()]).boxed()
    }
}

/// A store whose every call fails with an infrastructure error.
#[derive(Debug)]
pub struct FailingLocalStore;

#[async_trait]
impl LocalStore for FailingLocalStore {
    async fn sample_questions(
        &self,
        _filter: &QuestionFilter,
        _amount: u32,
        _excluding: &HashSet<QuestionId>,
    ) -> Result<Vec<Question>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    async fn find_category_by_name(&self, _name: &str) -> Result<Option<Category>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    async fn find_question_by_text(&self, _text: &str) -> Result<Option<Question>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    async fn max_question_id(&self) -> Result<Option<QuestionId>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    async fn min_category_id(&self) -> Result<Option<CategoryId>, DomainError> {
        Err(DomainError::Infrastructure("store unavailable".into()))
    }

    fn category_counts(&self) -> BoxStream<'static, Vec<CategoryCount>> {
        stream::empty().boxed()
    }
}
