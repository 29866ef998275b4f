//! The committed request list.

use serde::{Deserialize, Serialize};
use trivia_core::error::DomainError;
use trivia_core::model::{CategoryId, Difficulty, GameSetting};

use super::scope::Scope;

/// Ordered list of accepted game settings, at most one per
/// (category, difficulty) choice.
///
/// Entries are kept ordered by scope breadth (cells, then rows and columns,
/// then the whole table), in commit order within each breadth. Executing the
/// list front to back therefore serves the narrowest pools first, so a broad
/// wildcard request never takes questions a narrower one was promised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GameSetting>", into = "Vec<GameSetting>")]
pub struct CommittedRequests {
    entries: Vec<GameSetting>,
}

impl CommittedRequests {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a setting into the list and returns its position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is zero or the same
    /// (category, difficulty) choice is already committed.
    pub fn commit(&mut self, setting: GameSetting) -> Result<usize, DomainError> {
        if setting.amount == 0 {
            return Err(DomainError::Validation(
                "a committed request must ask for at least one question".to_owned(),
            ));
        }
        if self.contains_choice(setting.category_id(), setting.difficulty) {
            return Err(DomainError::Validation(format!(
                "choice (category {:?}, difficulty {:?}) is already committed",
                setting.category_id(),
                setting.difficulty
            )));
        }
        let breadth = Scope::of_setting(&setting).breadth();
        let position = self
            .entries
            .iter()
            .position(|e| Scope::of_setting(e).breadth() > breadth)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, setting);
        Ok(position)
    }

    /// Changes the amount of the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `index` is out of range or
    /// `amount` is zero.
    pub fn set_amount(&mut self, index: usize, amount: u32) -> Result<(), DomainError> {
        if amount == 0 {
            return Err(DomainError::Validation(
                "a committed request must ask for at least one question".to_owned(),
            ));
        }
        let len = self.entries.len();
        let entry = self.entries.get_mut(index).ok_or_else(|| {
            DomainError::Validation(format!("no committed request at index {index} (len {len})"))
        })?;
        entry.amount = amount;
        Ok(())
    }

    /// Removes and returns the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<GameSetting, DomainError> {
        if index >= self.entries.len() {
            return Err(DomainError::Validation(format!(
                "no committed request at index {index} (len {})",
                self.entries.len()
            )));
        }
        Ok(self.entries.remove(index))
    }

    /// Returns `true` if exactly this choice is already committed.
    #[must_use]
    pub fn contains_choice(&self, category_id: Option<CategoryId>, difficulty: Option<Difficulty>) -> bool {
        self.entries.iter().any(|e| e.is_choice(category_id, difficulty))
    }

    /// Sum of all committed amounts.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.amount)).sum()
    }

    /// Iterates over the entries in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, GameSetting> {
        self.entries.iter()
    }

    /// The entries in execution order.
    #[must_use]
    pub fn as_slice(&self) -> &[GameSetting] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommittedRequests {
    type Item = &'a GameSetting;
    type IntoIter = std::slice::Iter<'a, GameSetting>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl TryFrom<Vec<GameSetting>> for CommittedRequests {
    type Error = DomainError;

    fn try_from(settings: Vec<GameSetting>) -> Result<Self, Self::Error> {
        let mut committed = Self::new();
        for setting in settings {
            committed.commit(setting)?;
        }
        Ok(committed)
    }
}

impl From<CommittedRequests> for Vec<GameSetting> {
    fn from(committed: CommittedRequests) -> Self {
        committed.entries
    }
}
