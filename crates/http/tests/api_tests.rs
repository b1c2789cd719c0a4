//! Router tests driven through `oneshot` against a temporary SQLite catalogue.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use shelfscore_core::Dataset;
use shelfscore_http::{create_router, AppState};
use shelfscore_service::{IngestConfig, IngestMode};
use shelfscore_storage::StorageBackend;
use tempfile::TempDir;
use tower::util::ServiceExt;

fn setup_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = StorageBackend::new_sqlite(&temp_dir.path().join("api.db")).unwrap();
    let config = IngestConfig::default()
        .with_mode(IngestMode::Atomic)
        .with_pacing(Duration::ZERO);
    let state = AppState::new(Arc::new(storage), Arc::new(Dataset::embedded().unwrap()), config);
    (create_router(Arc::new(state)), temp_dir)
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request(method, uri)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_and_version() {
    let (app, _temp_dir) = setup_app();
    let response = app.clone().oneshot(request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = call(&app, "GET", "/api/version").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn ingest_books_then_reviews_reports_counters() {
    let (app, _temp_dir) = setup_app();

    let (status, books) = call(&app, "POST", "/api/ingest/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books["success"], true);
    assert_eq!(books["attempted"], 6);
    assert_eq!(books["booksAdded"], 6);
    assert_eq!(books["failedBooks"].as_array().unwrap().len(), 0);

    let (status, reviews) = call(&app, "POST", "/api/ingest/reviews").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews["success"], true);
    assert_eq!(reviews["attempted"], 29);
    assert_eq!(reviews["reviewsAdded"], 28);
    assert_eq!(reviews["validationErrors"], 1);
    assert_eq!(reviews["booksProcessed"], 6);
    assert_eq!(reviews["skippedMissingBook"], 0);
}

#[tokio::test]
async fn ingest_all_returns_both_results() {
    let (app, _temp_dir) = setup_app();
    let (status, body) = call(&app, "POST", "/api/ingest/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["books"]["booksAdded"], 6);
    assert_eq!(body["reviews"]["reviewsAdded"], 28);

    let (_, stats) = call(&app, "GET", "/api/stats").await;
    assert_eq!(stats["book_count"], 6);
    assert_eq!(stats["review_count"], 28);
}

#[tokio::test]
async fn books_listing_sorted_by_score() {
    let (app, _temp_dir) = setup_app();
    call(&app, "POST", "/api/ingest/all").await;

    let (status, body) = call(&app, "GET", "/api/books?sort=critic_score&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 6);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Project Hail Mary");
    assert_eq!(items[0]["calculated_critic_score"], 91.8);

    let (_, memoirs) = call(&app, "GET", "/api/books?genre=memoir").await;
    assert_eq!(memoirs["total"], 1);
    assert_eq!(memoirs["items"][0]["title"], "Educated");
}

#[tokio::test]
async fn unknown_sort_is_bad_request() {
    let (app, _temp_dir) = setup_app();
    let (status, body) = call(&app, "GET", "/api/books?sort=rating").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rating"));
}

#[tokio::test]
async fn book_detail_reviews_and_score() {
    let (app, _temp_dir) = setup_app();
    call(&app, "POST", "/api/ingest/all").await;
    let (_, list) = call(&app, "GET", "/api/books?genre=memoir").await;
    let id = list["items"][0]["id"].as_str().unwrap().to_owned();

    let (status, book) = call(&app, "GET", &format!("/api/books/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["critic_review_count"], 5);

    let (status, reviews) = call(&app, "GET", &format!("/api/books/{id}/reviews")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 5);

    let (status, score) = call(&app, "POST", &format!("/api/books/{id}/score")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(score["calculated_critic_score"], 91.0);
    assert_eq!(score["critic_review_count"], 5);
}

#[tokio::test]
async fn unknown_book_is_404() {
    let (app, _temp_dir) = setup_app();
    for (method, uri) in [
        ("GET", "/api/books/missing"),
        ("GET", "/api/books/missing/reviews"),
        ("POST", "/api/books/missing/score"),
    ] {
        let (status, body) = call(&app, method, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"], "book 'missing' not found");
    }
}
