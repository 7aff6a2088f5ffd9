//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use storyreel_core::clock::{Clock, SystemClock};
use storyreel_core::store::KeyValueStore;
use storyreel_graph::application::builtin::forest_graph;
use storyreel_narrative::application::reader::Reader;
use storyreel_narrative::domain::resolver::PlaybackTiming;
use storyreel_navigation::domain::viewport::Viewport;
use storyreel_session::domain::state::StateDefaults;
use storyreel_store::sqlite_store::SqliteKeyValueStore;
use storyreel_test_support::RecordingAudioPlayer;
use tower::ServiceExt;

use storyreel_api::state::AppState;

/// Playback fast enough for a test to watch it finish.
pub fn fast_timing() -> PlaybackTiming {
    PlaybackTiming {
        choice_delay: Duration::from_millis(5),
        step_delay: Duration::from_millis(10),
        settle_delay: Duration::from_millis(20),
    }
}

/// An in-memory SQLite store. One connection, so every query sees the same
/// database.
pub async fn memory_store() -> Arc<dyn KeyValueStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteKeyValueStore::new(pool);
    store.ensure_schema().await.unwrap();
    Arc::new(store)
}

/// Build app state over the built-in story, a real SQLite store and the
/// system clock.
pub async fn build_test_state(kv: Arc<dyn KeyValueStore>) -> AppState {
    let graph = Arc::new(forest_graph().unwrap());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let reader = Reader::open(
        kv,
        Arc::clone(&graph),
        StateDefaults::for_graph(&graph),
        Viewport::new(400.0, 800.0).unwrap(),
        fast_timing(),
        Arc::clone(&clock),
    )
    .await
    .unwrap();
    AppState::new(reader, Arc::new(RecordingAudioPlayer::new()), clock)
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    storyreel_api::build_router(state)
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
