//! HTTP client for the Open Trivia Database.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use trivia_core::error::DomainError;
use trivia_core::model::{CategoryCount, CategoryId, QuestionCount, QuestionFilter};
use trivia_core::remote::{RemoteQuestion, RemoteService, ResponseCode, SessionToken};

use crate::error::OpenTdbError;
use crate::wire::{
    CategoryCountResponse, CategoryListResponse, GlobalCountResponse, QuestionsResponse, TokenResponse,
    join_counts,
};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";

/// `RemoteService` backed by the Open Trivia Database HTTP API.
#[derive(Debug, Clone)]
pub struct OpenTdbClient {
    client: Client,
    base_url: String,
}

impl OpenTdbClient {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `OpenTdbError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OpenTdbError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, OpenTdbError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(query)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_body(status, &body)
    }
}

/// Decodes a response body. An error status still yields the body when it
/// parses, so a rate-limit answer keeps its `response_code`.
pub(crate) fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, OpenTdbError> {
    match serde_json::from_slice(body) {
        Ok(decoded) => Ok(decoded),
        Err(_) if !status.is_success() => Err(OpenTdbError::Status(status.as_u16())),
        Err(err) => Err(OpenTdbError::Json(err)),
    }
}

/// Query string of a question page request.
pub(crate) fn questions_query(
    amount: u32,
    filter: &QuestionFilter,
    token: &SessionToken,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("amount", amount.to_string())];
    if let Some(category_id) = filter.category_id {
        query.push(("category", category_id.to_string()));
    }
    if let Some(difficulty) = filter.difficulty {
        query.push(("difficulty", difficulty.as_str().to_owned()));
    }
    if let Some(kind) = filter.kind {
        query.push(("type", kind.as_str().to_owned()));
    }
    if !token.as_str().is_empty() {
        query.push(("token", token.as_str().to_owned()));
    }
    query.push(("encode", "base64".to_owned()));
    query
}

#[async_trait]
impl RemoteService for OpenTdbClient {
    #[instrument(skip(self))]
    async fn new_session_token(&self) -> Result<(ResponseCode, SessionToken), DomainError> {
        let response: TokenResponse = self
            .get("api_token.php", &[("command", "request".to_owned())])
            .await?;
        let code = ResponseCode::from(response.response_code);
        debug!(%code, "session token requested");
        Ok((code, SessionToken(response.token)))
    }

    #[instrument(skip(self, token))]
    async fn fetch_questions(
        &self,
        amount: u32,
        filter: &QuestionFilter,
        token: &SessionToken,
    ) -> Result<(ResponseCode, Vec<RemoteQuestion>), DomainError> {
        let response: QuestionsResponse = self
            .get("api.php", &questions_query(amount, filter, token))
            .await?;
        let code = ResponseCode::from(response.response_code);
        let questions = response
            .results
            .into_iter()
            .map(|encoded| encoded.decode())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%code, received = questions.len(), "question page received");
        Ok((code, questions))
    }

    #[instrument(skip(self))]
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, DomainError> {
        let list: CategoryListResponse = self.get("api_category.php", &[]).await?;
        let global: GlobalCountResponse = self.get("api_count_global.php", &[]).await?;
        Ok(join_counts(list, &global))
    }

    #[instrument(skip(self))]
    async fn category_count(&self, category_id: CategoryId) -> Result<QuestionCount, DomainError> {
        let response: CategoryCountResponse = self
            .get("api_count.php", &[("category", category_id.to_string())])
            .await?;
        Ok(response.category_question_count.into())
    }
}
