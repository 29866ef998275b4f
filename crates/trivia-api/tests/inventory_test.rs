//! Integration tests for the Question Inventory routes.

mod common;

use axum::http::StatusCode;
use trivia_core::model::{Category, CategoryCount, Difficulty, QuestionCount};
use trivia_test_support::{RemoteCall, ScriptedRemoteService};

fn remote_with_two_categories() -> ScriptedRemoteService {
    ScriptedRemoteService::new().with_categories(vec![
        common::category_count(9, "General Knowledge", 3, 2, 1),
        common::category_count(10, "Entertainment: Books", 2, 0, 0),
    ])
}

#[tokio::test]
async fn test_get_remote_inventory_loads_and_caches_snapshot() {
    // Arrange
    let app = common::build_test_app(remote_with_two_categories());

    // Act
    let (status, json) = common::get_json(app.router.clone(), "/api/v1/inventory?source=remote").await;
    let (_, again) = common::get_json(app.router, "/api/v1/inventory?source=remote").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["origin"], "remote");
    assert_eq!(json["entries"].as_array().unwrap().len(), 2);
    assert_eq!(json["entries"][0]["category"]["name"], "General Knowledge");
    assert_eq!(json["entries"][0]["count"]["total"], 6);
    assert_eq!(again, json);
    let listings = app
        .remote
        .calls()
        .into_iter()
        .filter(|call| *call == RemoteCall::Categories)
        .count();
    assert_eq!(listings, 1);
}

#[tokio::test]
async fn test_get_local_inventory_counts_stored_questions() {
    // Arrange
    let app = common::build_test_app(ScriptedRemoteService::new());
    let general = Category::new(9, "General Knowledge");
    app.store
        .save_questions(&[
            common::question(1, &general, Difficulty::Easy),
            common::question(2, &general, Difficulty::Easy),
            common::question(3, &general, Difficulty::Hard),
        ])
        .unwrap();

    // Act
    let (status, json) = common::get_json(app.router, "/api/v1/inventory").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["origin"], "local");
    assert_eq!(json["entries"][0]["count"]["total"], 3);
    assert_eq!(json["entries"][0]["count"]["easy"], 2);
    assert_eq!(json["entries"][0]["count"]["hard"], 1);
}

#[tokio::test]
async fn test_refresh_syncs_categories_into_store() {
    // Arrange
    let app = common::build_test_app(remote_with_two_categories());

    // Act
    let (status, json) = common::post_json(
        app.router.clone(),
        "/api/v1/inventory/refresh",
        &serde_json::json!({}),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inserted"].as_array().unwrap().len(), 2);
    assert!(json["removed"].as_array().unwrap().is_empty());
    let stored: Vec<String> = app
        .store
        .categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(stored, vec!["General Knowledge", "Entertainment: Books"]);

    let (_, health) = common::get_json(app.router, "/health").await;
    assert_eq!(health["remote_inventory_loaded"], true);
}

#[tokio::test]
async fn test_refresh_with_refine_fills_in_breakdowns() {
    // Arrange
    let remote = ScriptedRemoteService::new()
        .with_categories(vec![CategoryCount {
            category: Category::new(9, "General Knowledge"),
            count: QuestionCount::provisional(6),
        }])
        .with_count(9, QuestionCount::from_breakdown(3, 2, 1));
    let app = common::build_test_app(remote);

    // Act
    let (status, json) = common::post_json(
        app.router,
        "/api/v1/inventory/refresh",
        &serde_json::json!({ "refine": true }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let count = &json["inventory"]["entries"][0]["count"];
    assert_eq!(count["total"], 6);
    assert_eq!(count["easy"], 3);
    assert_eq!(count["medium"], 2);
    assert_eq!(count["hard"], 1);
    assert!(app.remote.calls().contains(&RemoteCall::Count(9)));
}

#[tokio::test]
async fn test_refresh_reports_failed_refinement() {
    // Arrange
    let remote = ScriptedRemoteService::new().with_categories(vec![CategoryCount {
        category: Category::new(9, "General Knowledge"),
        count: QuestionCount::provisional(6),
    }]);
    let app = common::build_test_app(remote);

    // Act
    let (status, json) = common::post_json(
        app.router,
        "/api/v1/inventory/refresh",
        &serde_json::json!({ "refine": true }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "category_not_found");
    assert!(app.state.remote_inventory.read().await.is_none());
}
