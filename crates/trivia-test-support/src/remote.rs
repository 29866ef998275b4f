//! Scripted remote service.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;
use trivia_core::error::DomainError;
use trivia_core::model::{CategoryCount, CategoryId, QuestionCount, QuestionFilter};
use trivia_core::remote::{RemoteQuestion, RemoteService, ResponseCode, SessionToken};

/// A call received by [`ScriptedRemoteService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// `new_session_token`.
    Token,
    /// `fetch_questions`, with the time it was received.
    Questions {
        /// Requested amount.
        amount: u32,
        /// Requested filter.
        filter: QuestionFilter,
        /// Token passed along.
        token: SessionToken,
        /// When the call arrived.
        at: Instant,
    },
    /// `category_counts`.
    Categories,
    /// `category_count`.
    Count(CategoryId),
}

#[derive(Debug)]
enum ScriptedPage {
    Page(ResponseCode, Vec<RemoteQuestion>),
    TransportFailure(String),
}

/// A remote service answering from a script and recording every call.
///
/// Question pages are served in the order they were scripted. Once the
/// script runs out, further pages answer `NoResults`.
#[derive(Debug)]
pub struct ScriptedRemoteService {
    token_code: ResponseCode,
    pages: Mutex<VecDeque<ScriptedPage>>,
    categories: Vec<CategoryCount>,
    counts: HashMap<CategoryId, QuestionCount>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl Default for ScriptedRemoteService {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRemoteService {
    /// A service that grants tokens and has nothing else scripted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_code: ResponseCode::Success,
            pages: Mutex::new(VecDeque::new()),
            categories: Vec::new(),
            counts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers token requests with `code`.
    #[must_use]
    pub fn with_token_code(mut self, code: ResponseCode) -> Self {
        self.token_code = code;
        self
    }

    /// Queues a question page.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_page(self, code: ResponseCode, questions: Vec<RemoteQuestion>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .push_back(ScriptedPage::Page(code, questions));
        self
    }

    /// Queues a page request that fails in transport.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_transport_failure(self, message: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .push_back(ScriptedPage::TransportFailure(message.to_owned()));
        self
    }

    /// Sets the category listing.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<CategoryCount>) -> Self {
        self.categories = categories;
        self
    }

    /// Sets the refined breakdown of one category.
    #[must_use]
    pub fn with_count(mut self, category_id: CategoryId, count: QuestionCount) -> Self {
        self.counts.insert(category_id, count);
        self
    }

    /// Every call received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Amount and filter of every question page request.
    pub fn question_calls(&self) -> Vec<(u32, QuestionFilter)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::Questions { amount, filter, .. } => Some((amount, filter)),
                _ => None,
            })
            .collect()
    }

    /// Arrival time of every question page request.
    pub fn question_call_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::Questions { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteService for ScriptedRemoteService {
    async fn new_session_token(&self) -> Result<(ResponseCode, SessionToken), DomainError> {
        self.record(RemoteCall::Token);
        Ok((self.token_code, SessionToken("scripted-token".into())))
    }

    async fn fetch_questions(
        &self,
        amount: u32,
        filter: &QuestionFilter,
        token: &SessionToken,
    ) -> Result<(ResponseCode, Vec<RemoteQuestion>), DomainError> {
        self.record(RemoteCall::Questions {
            amount,
            filter: *filter,
            token: token.clone(),
            at: Instant::now(),
        });
        let next = self.pages.lock().unwrap().pop_front();
        match next {
            Some(ScriptedPage::Page(code, questions)) => Ok((code, questions)),
            Some(ScriptedPage::TransportFailure(message)) => Err(DomainError::Infrastructure(message)),
            None => Ok((ResponseCode::NoResults, Vec::new())),
        }
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, DomainError> {
        self.record(RemoteCall::Categories);
        Ok(self.categories.clone())
    }

    async fn category_count(&self, category_id: CategoryId) -> Result<QuestionCount, DomainError> {
        self.record(RemoteCall::Count(category_id));
        self.counts
            .get(&category_id)
            .copied()
            .ok_or(DomainError::CategoryNotFound(category_id))
    }
}
