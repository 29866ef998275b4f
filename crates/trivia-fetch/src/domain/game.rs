//! The materialized game.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trivia_core::model::{Category, Question, QuestionId};
use uuid::Uuid;

/// Game metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetail {
    /// Game identifier.
    pub id: Uuid,
    /// When the game was assembled.
    pub timestamp: DateTime<Utc>,
    /// Seconds spent playing so far.
    pub elapsed_seconds: u64,
}

/// One question of a game with the player's answer, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuestion {
    /// The question, carrying its category.
    pub question: Question,
    /// The answer given during play.
    pub user_answer: Option<String>,
}

/// An ordered batch of questions produced by one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Game metadata.
    pub detail: GameDetail,
    /// Questions in play order.
    pub questions: Vec<GameQuestion>,
}

impl Game {
    /// Creates an empty game.
    #[must_use]
    pub fn new(id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            detail: GameDetail {
                id,
                timestamp,
                elapsed_seconds: 0,
            },
            questions: Vec::new(),
        }
    }

    /// Appends questions in order, unanswered.
    pub fn extend(&mut self, questions: impl IntoIterator<Item = Question>) {
        self.questions
            .extend(questions.into_iter().map(|question| GameQuestion {
                question,
                user_answer: None,
            }));
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the game holds no question.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Ids of every question in the game.
    #[must_use]
    pub fn question_ids(&self) -> HashSet<QuestionId> {
        self.questions.iter().map(|q| q.question.id).collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&Category> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .map(|q| &q.question.category)
            .filter(|category| seen.insert(category.id))
            .collect()
    }
}
