//! Identity reconciliation of remote questions.
//!
//! Remote questions carry no id and name their category instead of
//! referencing it. The reconciler resolves both against the local store by
//! natural key (category name, question text), so saving a fetched game
//! later updates existing rows instead of duplicating them. It only reads
//! from the store.

use std::collections::HashMap;

use tracing::debug;
use trivia_core::error::DomainError;
use trivia_core::model::{Category, CategoryId, Question, QuestionId};
use trivia_core::remote::RemoteQuestion;
use trivia_core::repository::LocalStore;
use trivia_inventory::QuestionInventory;

/// Maps remote questions onto local identities for the duration of one
/// fetch.
pub struct IdentityReconciler<'a> {
    store: &'a dyn LocalStore,
    inventory: &'a QuestionInventory,
    categories: HashMap<String, Category>,
    questions: HashMap<String, QuestionId>,
    next_question_id: Option<QuestionId>,
    next_category_id: Option<CategoryId>,
}

impl std::fmt::Debug for IdentityReconciler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityReconciler")
            .field("categories", &self.categories.len())
            .field("questions", &self.questions.len())
            .finish_non_exhaustive()
    }
}

impl<'a> IdentityReconciler<'a> {
    /// Creates a reconciler reading from `store`, falling back to the
    /// categories of `inventory`.
    #[must_use]
    pub fn new(store: &'a dyn LocalStore, inventory: &'a QuestionInventory) -> Self {
        Self {
            store,
            inventory,
            categories: HashMap::new(),
            questions: HashMap::new(),
            next_question_id: None,
            next_category_id: None,
        }
    }

    /// Resolves a category name.
    ///
    /// Tries the store, then the inventory snapshot. An unknown name gets a
    /// fresh negative id below every id the store or the snapshot uses,
    /// stable for the rest of the fetch.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the lookup fails.
    pub async fn category(&mut self, name: &str) -> Result<Category, DomainError> {
        if let Some(category) = self.categories.get(name) {
            return Ok(category.clone());
        }
        let category = match self.store.find_category_by_name(name).await? {
            Some(stored) => stored,
            None => match self.inventory.category_by_name(name) {
                Some(listed) => listed.clone(),
                None => {
                    let id = self.fresh_category_id().await?;
                    debug!(name, id, "assigned fresh category id");
                    Category::new(id, name)
                }
            },
        };
        self.categories.insert(name.to_owned(), category.clone());
        Ok(category)
    }

    /// Resolves a remote question into a local one.
    ///
    /// A question whose text is already stored takes over the stored id;
    /// otherwise it gets a fresh id above every stored one. The same text
    /// always resolves to the same id within one reconciler.
    ///
    /// # Errors
    ///
    /// Returns the store's error if a lookup fails.
    pub async fn question(&mut self, remote: RemoteQuestion) -> Result<Question, DomainError> {
        let category = self.category(&remote.category).await?;
        let id = match self.questions.get(&remote.text) {
            Some(id) => *id,
            None => {
                let id = match self.store.find_question_by_text(&remote.text).await? {
                    Some(stored) => stored.id,
                    None => self.fresh_question_id().await?,
                };
                self.questions.insert(remote.text.clone(), id);
                id
            }
        };
        Ok(Question {
            id,
            category,
            difficulty: remote.difficulty,
            kind: remote.kind,
            text: remote.text,
            correct_answer: remote.correct_answer,
            incorrect_answers: remote.incorrect_answers,
        })
    }

    async fn fresh_question_id(&mut self) -> Result<QuestionId, DomainError> {
        let next = match self.next_question_id {
            Some(next) => next,
            None => self.store.max_question_id().await?.map_or(1, |max| max + 1),
        };
        self.next_question_id = Some(next + 1);
        Ok(next)
    }

    async fn fresh_category_id(&mut self) -> Result<CategoryId, DomainError> {
        let next = match self.next_category_id {
            Some(next) => next,
            None => {
                let stored = self.store.min_category_id().await?.unwrap_or(0);
                let listed = self.inventory.categories().map(|c| c.id).min().unwrap_or(0);
                stored.min(listed).min(0) - 1
            }
        };
        self.next_category_id = Some(next - 1);
        Ok(next)
    }
}
