//! In-memory `LocalStore`.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use tokio::sync::watch;
use tracing::{debug, info, instrument};
use trivia_core::error::DomainError;
use trivia_core::model::{Category, CategoryCount, CategoryId, Question, QuestionCount, QuestionFilter, QuestionId};
use trivia_core::repository::LocalStore;
use trivia_core::rng::{DeterministicRng, choose_indices};
use trivia_fetch::Game;
use trivia_inventory::{CategorySyncPlan, plan_category_sync};
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    categories: BTreeMap<CategoryId, Category>,
    questions: BTreeMap<QuestionId, Question>,
    games: Vec<Game>,
}

impl StoreState {
    fn counts(&self) -> Vec<CategoryCount> {
        self.categories
            .values()
            .map(|category| {
                let mut breakdown = [0_u32; 3];
                for question in self.questions.values().filter(|q| q.category.id == category.id) {
                    breakdown[question.difficulty as usize] += 1;
                }
                let [easy, medium, hard] = breakdown;
                CategoryCount {
                    category: category.clone(),
                    count: QuestionCount::from_breakdown(easy, medium, hard),
                }
            })
            .collect()
    }

    /// Resolves a category by name, inserting it if the name is new.
    fn upsert_category(&mut self, category: &Category) -> Category {
        if let Some(existing) = self.categories.values().find(|c| c.name == category.name) {
            return existing.clone();
        }
        let id = if self.categories.contains_key(&category.id) {
            self.categories.keys().next().map_or(0, |lowest| *lowest).min(0) - 1
        } else {
            category.id
        };
        let stored = Category::new(id, category.name.clone());
        self.categories.insert(id, stored.clone());
        stored
    }

    /// Stores a question by text, keeping the id of an existing one.
    fn upsert_question(&mut self, question: &Question) -> Question {
        let category = self.upsert_category(&question.category);
        let existing = self
            .questions
            .values()
            .find(|q| q.text == question.text)
            .map(|q| q.id);
        let id = match existing {
            Some(id) => id,
            None if question.id > 0 && !self.questions.contains_key(&question.id) => question.id,
            None => self.questions.keys().next_back().map_or(1, |max| max + 1),
        };
        let stored = Question {
            id,
            category,
            ..question.clone()
        };
        self.questions.insert(id, stored.clone());
        stored
    }

    fn rewrite_category(&mut self, old_id: CategoryId, category: &Category) {
        for question in self.questions.values_mut().filter(|q| q.category.id == old_id) {
            question.category = category.clone();
        }
        for game_question in self
            .games
            .iter_mut()
            .flat_map(|g| g.questions.iter_mut())
            .filter(|q| q.question.category.id == old_id)
        {
            game_question.question.category = category.clone();
        }
    }

    fn apply(&mut self, plan: &CategorySyncPlan) {
        for id in &plan.removed {
            self.categories.remove(id);
        }
        for (old_id, category) in &plan.rekeyed {
            self.categories.remove(old_id);
            self.categories.insert(category.id, category.clone());
            self.rewrite_category(*old_id, category);
        }
        for category in &plan.renamed {
            self.categories.insert(category.id, category.clone());
            self.rewrite_category(category.id, category);
        }
        for category in &plan.inserted {
            self.categories.insert(category.id, category.clone());
        }
    }
}

/// Question and game store held in memory.
///
/// Every change to the question or category tables publishes a fresh count
/// snapshot to the streams returned by `category_counts`.
pub struct MemoryStore {
    state: Mutex<StoreState>,
    rng: Mutex<Box<dyn DeterministicRng>>,
    counts: watch::Sender<Vec<CategoryCount>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Creates an empty store sampling with `rng`.
    #[must_use]
    pub fn new(rng: Box<dyn DeterministicRng>) -> Self {
        let (counts, _) = watch::channel(Vec::new());
        Self {
            state: Mutex::new(StoreState::default()),
            rng: Mutex::new(rng),
            counts,
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Infrastructure("store state lock poisoned".into()))
    }

    fn publish(&self, state: &StoreState) {
        self.counts.send_replace(state.counts());
    }

    /// All stored categories, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    pub fn categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.state()?.categories.values().cloned().collect())
    }

    /// Stores questions, matching existing rows by question text and
    /// categories by name. Returns the questions as stored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    #[instrument(skip_all, fields(questions = questions.len()))]
    pub fn save_questions(&self, questions: &[Question]) -> Result<Vec<Question>, DomainError> {
        let mut state = self.state()?;
        let stored: Vec<Question> = questions.iter().map(|q| state.upsert_question(q)).collect();
        self.publish(&state);
        debug!(stored = stored.len(), "questions saved");
        Ok(stored)
    }

    /// Stores a finished game together with its questions. Returns the game
    /// with its questions as stored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a game with the same id is
    /// already stored, or `DomainError::Infrastructure` if the store lock is
    /// poisoned.
    #[instrument(skip_all, fields(game_id = %game.detail.id))]
    pub fn save_game(&self, game: &Game) -> Result<Game, DomainError> {
        let mut state = self.state()?;
        if state.games.iter().any(|g| g.detail.id == game.detail.id) {
            return Err(DomainError::Validation(format!(
                "game {} is already saved",
                game.detail.id
            )));
        }
        let mut stored = game.clone();
        for game_question in &mut stored.questions {
            game_question.question = state.upsert_question(&game_question.question);
        }
        state.games.push(stored.clone());
        self.publish(&state);
        info!(questions = stored.len(), "game saved");
        Ok(stored)
    }

    /// All stored games, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    pub fn games(&self) -> Result<Vec<Game>, DomainError> {
        Ok(self.state()?.games.clone())
    }

    /// One stored game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    pub fn game(&self, id: Uuid) -> Result<Option<Game>, DomainError> {
        Ok(self.state()?.games.iter().find(|g| g.detail.id == id).cloned())
    }

    /// Brings the category table in line with the remote listing and
    /// returns the applied plan.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    #[instrument(skip_all, fields(remote = remote.len()))]
    pub fn sync_categories(&self, remote: &[Category]) -> Result<CategorySyncPlan, DomainError> {
        let mut state = self.state()?;
        let local: Vec<Category> = state.categories.values().cloned().collect();
        let owning: HashSet<CategoryId> = state.questions.values().map(|q| q.category.id).collect();
        let plan = plan_category_sync(&local, remote, &owning);
        if !plan.is_noop() {
            state.apply(&plan);
            self.publish(&state);
            info!(
                inserted = plan.inserted.len(),
                renamed = plan.renamed.len(),
                rekeyed = plan.rekeyed.len(),
                removed = plan.removed.len(),
                "category table synced"
            );
        }
        Ok(plan)
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn sample_questions(
        &self,
        filter: &QuestionFilter,
        amount: u32,
        excluding: &HashSet<QuestionId>,
    ) -> Result<Vec<Question>, DomainError> {
        let candidates: Vec<Question> = self
            .state()?
            .questions
            .values()
            .filter(|q| filter.matches(q) && !excluding.contains(&q.id))
            .cloned()
            .collect();
        if candidates.len() < amount as usize {
            return Err(DomainError::InsufficientQuestions {
                requested: amount,
                available: u32::try_from(candidates.len()).unwrap_or(u32::MAX),
            });
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DomainError::Infrastructure("store rng lock poisoned".into()))?;
        let picked = choose_indices(rng.as_mut(), candidates.len(), amount as usize);
        Ok(picked.into_iter().map(|i| candidates[i].clone()).collect())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .state()?
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn find_question_by_text(&self, text: &str) -> Result<Option<Question>, DomainError> {
        Ok(self
            .state()?
            .questions
            .values()
            .find(|q| q.text == text)
            .cloned())
    }

    async fn max_question_id(&self) -> Result<Option<QuestionId>, DomainError> {
        Ok(self.state()?.questions.keys().next_back().copied())
    }

    async fn min_category_id(&self) -> Result<Option<CategoryId>, DomainError> {
        Ok(self.state()?.categories.keys().next().copied())
    }

    fn category_counts(&self) -> BoxStream<'static, Vec<CategoryCount>> {
        let receiver = self.counts.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, (receiver, false)))
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use trivia_core::model::{Difficulty, QuestionKind};
    use trivia_core::rng::SeededRng;
    use trivia_test_support::MockRng;

    use super::*;

    fn question(id: QuestionId, category: Category, difficulty: Difficulty, text: &str) -> Question {
        Question {
            id,
            category,
            difficulty,
            kind: QuestionKind::Multiple,
            text: text.into(),
            correct_answer: "A".into(),
            incorrect_answers: vec!["B".into(), "C".into(), "D".into()],
        }
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new(Box::new(MockRng));
        let books = Category::new(10, "Books");
        let film = Category::new(11, "Film");
        store
            .save_questions(&[
                question(1, books.clone(), Difficulty::Easy, "B1"),
                question(2, books.clone(), Difficulty::Easy, "B2"),
                question(3, books, Difficulty::Hard, "B3"),
                question(4, film, Difficulty::Medium, "F1"),
            ])
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_sample_excludes_ids_and_reports_shortfall() {
        // Arrange
        let store = seeded_store();
        let filter = QuestionFilter {
            category_id: Some(10),
            ..QuestionFilter::default()
        };

        // Act
        let sample = store
            .sample_questions(&filter, 2, &HashSet::from([1]))
            .await
            .unwrap();
        let short = store.sample_questions(&filter, 3, &HashSet::from([1])).await;

        // Assert
        let ids: HashSet<QuestionId> = sample.iter().map(|q| q.id).collect();
        assert_eq!(ids, HashSet::from([2, 3]));
        assert!(matches!(
            short,
            Err(DomainError::InsufficientQuestions {
                requested: 3,
                available: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_seeded_sampling_is_repeatable() {
        let a = MemoryStore::new(Box::new(SeededRng::from_seed(3)));
        let b = MemoryStore::new(Box::new(SeededRng::from_seed(3)));
        let questions: Vec<Question> = (1..=20)
            .map(|id| question(id, Category::new(9, "General"), Difficulty::Easy, &format!("Q{id}")))
            .collect();
        a.save_questions(&questions).unwrap();
        b.save_questions(&questions).unwrap();

        let from_a = a.sample_questions(&QuestionFilter::default(), 5, &HashSet::new()).await.unwrap();
        let from_b = b.sample_questions(&QuestionFilter::default(), 5, &HashSet::new()).await.unwrap();

        assert_eq!(from_a, from_b);
    }

    #[test]
    fn test_save_questions_matches_existing_rows_by_natural_key() {
        // Arrange
        let store = seeded_store();
        let renamed_source = Category::new(-4, "Books");

        // Act
        let stored = store
            .save_questions(&[
                question(99, renamed_source, Difficulty::Easy, "B1"),
                question(4, Category::new(-1, "Art"), Difficulty::Hard, "A1"),
            ])
            .unwrap();

        // Assert
        assert_eq!(stored[0].id, 1);
        assert_eq!(stored[0].category, Category::new(10, "Books"));
        assert_eq!(stored[1].id, 5);
        assert_eq!(stored[1].category, Category::new(-1, "Art"));
        assert_eq!(store.categories().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_min_category_id_includes_local_only_categories() {
        let store = seeded_store();
        assert_eq!(store.min_category_id().await.unwrap(), Some(10));

        store
            .save_questions(&[question(5, Category::new(-3, "Art"), Difficulty::Easy, "A1")])
            .unwrap();

        assert_eq!(store.min_category_id().await.unwrap(), Some(-3));
        assert_eq!(
            MemoryStore::new(Box::new(MockRng)).min_category_id().await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_category_counts_stream_follows_saves() {
        // Arrange
        let store = seeded_store();
        let mut counts = store.category_counts();

        // Act
        let first = counts.next().await.unwrap();
        store
            .save_questions(&[question(0, Category::new(11, "Film"), Difficulty::Hard, "F2")])
            .unwrap();
        let second = counts.next().await.unwrap();

        // Assert
        let film = |snapshot: &[CategoryCount]| snapshot.iter().find(|c| c.category.id == 11).unwrap().count;
        assert_eq!(film(&first), QuestionCount::from_breakdown(0, 1, 0));
        assert_eq!(film(&second), QuestionCount::from_breakdown(0, 1, 1));
        assert!(second.iter().all(|c| c.count.is_authoritative()));
    }

    #[test]
    fn test_save_game_stores_questions_and_rejects_duplicates() {
        // Arrange
        let store = MemoryStore::new(Box::new(MockRng));
        let mut game = Game::new(Uuid::new_v4(), Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        game.extend([question(7, Category::new(12, "Music"), Difficulty::Medium, "M1")]);

        // Act
        let saved = store.save_game(&game).unwrap();
        let again = store.save_game(&game);

        // Assert
        assert_eq!(saved.questions[0].question.id, 7);
        assert_eq!(store.games().unwrap().len(), 1);
        assert_eq!(store.game(game.detail.id).unwrap(), Some(saved));
        assert!(matches!(again, Err(DomainError::Validation(_))));
        assert_eq!(store.categories().unwrap(), vec![Category::new(12, "Music")]);
    }

    #[test]
    fn test_sync_categories_rekeys_vanished_category_with_questions() {
        // Arrange
        let store = seeded_store();

        // Act
        let plan = store
            .sync_categories(&[Category::new(11, "Film & TV"), Category::new(12, "Music")])
            .unwrap();

        // Assert
        assert_eq!(plan.rekeyed, vec![(10, Category::new(-1, "Books"))]);
        assert_eq!(plan.renamed, vec![Category::new(11, "Film & TV")]);
        assert_eq!(plan.inserted, vec![Category::new(12, "Music")]);
        let categories = store.categories().unwrap();
        assert_eq!(
            categories,
            vec![
                Category::new(-1, "Books"),
                Category::new(11, "Film & TV"),
                Category::new(12, "Music"),
            ]
        );
    }

    #[tokio::test]
    async fn test_sync_categories_moves_questions_with_their_category() {
        let store = seeded_store();

        store.sync_categories(&[Category::new(11, "Film")]).unwrap();

        let books = store.find_question_by_text("B1").await.unwrap().unwrap();
        assert_eq!(books.category, Category::new(-1, "Books"));
        let easy_books = QuestionFilter {
            category_id: Some(-1),
            difficulty: Some(Difficulty::Easy),
            ..QuestionFilter::default()
        };
        let sample = store.sample_questions(&easy_books, 2, &HashSet::new()).await.unwrap();
        assert_eq!(sample.len(), 2);
    }
}
