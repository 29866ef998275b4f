//! Shared trivia model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Category identifier. Non-negative ids are synced with the remote service;
/// negative ids belong to categories kept locally after their remote
/// counterpart disappeared.
pub type CategoryId = i64;

/// Identifier of a locally persisted question.
pub type QuestionId = i64;

/// A question category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name, also the natural key used for reconciliation.
    pub name: String,
}

impl Category {
    /// Creates a new category.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns `true` if this category mirrors a remote category.
    #[must_use]
    pub fn is_remote_synced(&self) -> bool {
        self.id >= 0
    }
}

/// Question difficulty. An absent difficulty (`None`) means "any".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy questions.
    Easy,
    /// Medium questions.
    Medium,
    /// Hard questions.
    Hard,
}

impl Difficulty {
    /// Every concrete difficulty, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire name of the difficulty.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::Validation(format!(
                "unknown difficulty: {other}"
            ))),
        }
    }
}

/// Available question counts for one category.
///
/// Locally derived counts are authoritative and satisfy
/// `total == easy + medium + hard`. Remote counts start out provisional: the
/// total comes from the category listing and the breakdown stays zero until a
/// dedicated per-category refinement completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionCount {
    /// Total questions in the category.
    pub total: u32,
    /// Easy questions.
    pub easy: u32,
    /// Medium questions.
    pub medium: u32,
    /// Hard questions.
    pub hard: u32,
}

impl QuestionCount {
    /// Builds an authoritative count from its breakdown.
    #[must_use]
    pub fn from_breakdown(easy: u32, medium: u32, hard: u32) -> Self {
        Self {
            total: easy + medium + hard,
            easy,
            medium,
            hard,
        }
    }

    /// Builds a provisional count that only knows its total.
    #[must_use]
    pub fn provisional(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Returns `true` when the breakdown accounts for the whole total.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.total == self.easy + self.medium + self.hard
    }

    /// Count for one difficulty, or the total when `difficulty` is `None`.
    #[must_use]
    pub fn get(&self, difficulty: Option<Difficulty>) -> u32 {
        match difficulty {
            None => self.total,
            Some(Difficulty::Easy) => self.easy,
            Some(Difficulty::Medium) => self.medium,
            Some(Difficulty::Hard) => self.hard,
        }
    }
}

/// A category paired with its question counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category.
    pub category: Category,
    /// Its question counts.
    pub count: QuestionCount,
}

/// Question answer format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Multiple choice.
    Multiple,
    /// True / false.
    Boolean,
}

impl QuestionKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Multiple => "multiple",
            QuestionKind::Boolean => "boolean",
        }
    }
}

/// A question with its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier (local once reconciled).
    pub id: QuestionId,
    /// The category the question belongs to.
    pub category: Category,
    /// Question difficulty.
    pub difficulty: Difficulty,
    /// Answer format.
    pub kind: QuestionKind,
    /// Question statement, the natural key used for reconciliation.
    pub text: String,
    /// The correct answer.
    pub correct_answer: String,
    /// The wrong answers.
    pub incorrect_answers: Vec<String>,
}

/// Narrows a question lookup. Every `None` field is a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestionFilter {
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Restrict to one difficulty.
    pub difficulty: Option<Difficulty>,
    /// Restrict to one answer format.
    pub kind: Option<QuestionKind>,
}

impl QuestionFilter {
    /// Returns `true` if `question` passes every set field.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        self.category_id.is_none_or(|id| question.category.id == id)
            && self.difficulty.is_none_or(|d| question.difficulty == d)
            && self.kind.is_none_or(|k| question.kind == k)
    }
}

/// One requested part of a game: how many questions from which
/// (category, difficulty) scope. `None` on either axis means "any".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetting {
    /// Requested category, or any.
    pub category: Option<Category>,
    /// Requested difficulty, or any.
    pub difficulty: Option<Difficulty>,
    /// Number of questions, at least 1.
    pub amount: u32,
}

impl GameSetting {
    /// Creates a new game setting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `amount` is zero.
    pub fn new(
        category: Option<Category>,
        difficulty: Option<Difficulty>,
        amount: u32,
    ) -> Result<Self, DomainError> {
        if amount == 0 {
            return Err(DomainError::Validation(
                "a game setting must request at least one question".to_owned(),
            ));
        }
        Ok(Self {
            category,
            difficulty,
            amount,
        })
    }

    /// The requested category id, if any.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().map(|c| c.id)
    }

    /// Returns `true` if this setting targets exactly the given choice.
    #[must_use]
    pub fn is_choice(&self, category_id: Option<CategoryId>, difficulty: Option<Difficulty>) -> bool {
        self.category_id() == category_id && self.difficulty == difficulty
    }

    /// The filter selecting questions this setting may draw from.
    #[must_use]
    pub fn filter(&self) -> QuestionFilter {
        QuestionFilter {
            category_id: self.category_id(),
            difficulty: self.difficulty,
            kind: None,
        }
    }
}
