//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use trivia_api::state::AppState;
use trivia_core::clock::Clock;
use trivia_core::model::{Category, CategoryCount, CategoryId, Difficulty, Question, QuestionCount, QuestionKind};
use trivia_core::remote::RemoteQuestion;
use trivia_core::throttle::Throttle;
use trivia_store::MemoryStore;
use trivia_test_support::{FixedClock, MockRng, ScriptedRemoteService};

/// The application under test together with its collaborators.
pub struct TestApp {
    /// Full router, as served by the binary.
    pub router: Router,
    /// Shared application state.
    pub state: AppState,
    /// Local store behind the state.
    pub store: Arc<MemoryStore>,
    /// Remote fake behind the state.
    pub remote: Arc<ScriptedRemoteService>,
}

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over an empty `MemoryStore`, the given remote
/// fake and a short throttle window.
pub fn build_test_app(remote: ScriptedRemoteService) -> TestApp {
    let store = Arc::new(MemoryStore::new(Box::new(MockRng)));
    let remote = Arc::new(remote);
    let state = AppState::new(
        Arc::clone(&store),
        remote.clone(),
        fixed_clock(),
        Throttle::new(Duration::from_millis(10)),
    );
    TestApp {
        router: trivia_api::app(state.clone()),
        state,
        store,
        remote,
    }
}

/// A remote category entry with an exact breakdown.
pub fn category_count(id: CategoryId, name: &str, easy: u32, medium: u32, hard: u32) -> CategoryCount {
    CategoryCount {
        category: Category::new(id, name),
        count: QuestionCount::from_breakdown(easy, medium, hard),
    }
}

/// A stored question.
pub fn question(id: i64, category: &Category, difficulty: Difficulty) -> Question {
    Question {
        id,
        category: category.clone(),
        difficulty,
        kind: QuestionKind::Multiple,
        text: format!("Stored question {id}?"),
        correct_answer: "Yes".to_owned(),
        incorrect_answers: vec!["No".to_owned(), "Maybe".to_owned(), "Never".to_owned()],
    }
}

/// A question as the remote service sends it.
pub fn remote_question(category: &str, difficulty: Difficulty, text: &str) -> RemoteQuestion {
    RemoteQuestion {
        category: category.to_owned(),
        difficulty,
        kind: QuestionKind::Boolean,
        text: text.to_owned(),
        correct_answer: "True".to_owned(),
        incorrect_answers: vec!["False".to_owned()],
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
