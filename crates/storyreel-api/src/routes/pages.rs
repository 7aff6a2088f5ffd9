//! Read-only catalog routes.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use storyreel_core::ids::PageId;
use storyreel_graph::domain::page::Page;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn list_pages(State(state): State<AppState>) -> Json<Vec<Page>> {
    Json(state.graph.pages().to_vec())
}

/// GET /{id}
async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Page>, ApiError> {
    let page = state.graph.get_page(PageId(id))?;
    Ok(Json(page.clone()))
}

/// Returns the router for catalog pages.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages))
        .route("/{id}", get(get_page))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use storyreel_graph::application::builtin::forest_graph;
    use storyreel_narrative::application::reader::Reader;
    use storyreel_narrative::domain::resolver::PlaybackTiming;
    use storyreel_navigation::domain::viewport::Viewport;
    use storyreel_session::domain::state::StateDefaults;
    use storyreel_test_support::{InMemoryKeyValueStore, ManualClock, RecordingAudioPlayer};
    use tower::ServiceExt;

    async fn test_app_state() -> AppState {
        let graph = Arc::new(forest_graph().unwrap());
        let clock = Arc::new(ManualClock::new());
        let reader = Reader::open(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::clone(&graph),
            StateDefaults::for_graph(&graph),
            Viewport::new(400.0, 800.0).unwrap(),
            PlaybackTiming::default(),
            clock.clone(),
        )
        .await
        .unwrap();
        AppState::new(reader, Arc::new(RecordingAudioPlayer::new()), clock)
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let app = router().with_state(test_app_state().await);
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_pages_returns_catalog_order() {
        let (status, json) = get("/").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|page| page["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 7, 8, 9, 5, 6, 10, 11, 12, 13, 14, 15]);
    }

    #[tokio::test]
    async fn test_get_page_returns_choice_page() {
        let (status, json) = get("/3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kind"], "choice");
        assert_eq!(json["choices"][0]["label"], "Fight");
        assert_eq!(json["choices"][0]["nextPage"], 4);
    }

    #[tokio::test]
    async fn test_get_missing_page_returns_404() {
        let (status, json) = get("/404").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "page_not_found");
    }
}
