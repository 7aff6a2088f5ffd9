//! Routes for the reader: choices, scrolling and preferences.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use storyreel_core::ids::{Orientation, PageId};
use storyreel_narrative::application::view::ReaderView;
use storyreel_narrative::domain::commands::{
    ChangeOrientation, ChooseOption, ResetProgress, SettleScroll,
};
use storyreel_narrative::domain::resolver::{StateDeltas, StepKind};
use storyreel_navigation::domain::navigator::{ScrollCommand, SettleOutcome};
use storyreel_navigation::domain::viewport::Viewport;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /choose.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseRequest {
    /// Index into the current page's choices.
    pub choice_index: usize,
}

/// Request body for POST /drag and POST /settle.
#[derive(Debug, Deserialize)]
pub struct OffsetRequest {
    pub offset: f64,
}

/// Request body for POST /orientation.
#[derive(Debug, Deserialize)]
pub struct OrientationRequest {
    pub orientation: Orientation,
}

/// Request body for POST /volume.
#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    pub volume: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub page: PageId,
    pub delay_ms: u64,
    pub kind: StepKind,
}

/// Response body for POST /choose.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseResponse {
    pub correlation_id: Uuid,
    pub choice: String,
    pub deltas: StateDeltas,
    pub steps: Vec<StepResponse>,
}

/// Response body for POST /drag.
#[derive(Debug, Serialize)]
pub struct DragResponse {
    /// Set when a forward drag off a choice page must be undone.
    pub revert: Option<ScrollCommand>,
}

/// Response body for POST /settle.
#[derive(Debug, Serialize)]
pub struct SettleResponse {
    /// `moved`, `held_at_choice`, `snapped_back` or `stayed`.
    pub outcome: &'static str,
    pub page: PageId,
    pub scroll: Option<ScrollCommand>,
}

#[derive(Debug, Serialize)]
pub struct VolumeResponse {
    pub volume: f32,
}

/// GET /
async fn get_reader(State(state): State<AppState>) -> Result<Json<ReaderView>, ApiError> {
    let reader = state.reader.lock().await;
    Ok(Json(reader.view()?))
}

/// POST /choose
#[instrument(skip(state, request), fields(choice_index = request.choice_index))]
async fn choose(
    State(state): State<AppState>,
    Json(request): Json<ChooseRequest>,
) -> Result<Json<ChooseResponse>, ApiError> {
    let command = ChooseOption {
        correlation_id: Uuid::new_v4(),
        choice_index: request.choice_index,
    };

    info!(correlation_id = %command.correlation_id, "handling choose_option command");

    let resolution = state.reader.lock().await.choose(&command)?;
    state.wake_playback();

    let steps = resolution
        .steps
        .iter()
        .map(|step| StepResponse {
            page: step.page,
            delay_ms: u64::try_from(step.delay.as_millis()).unwrap_or(u64::MAX),
            kind: step.kind,
        })
        .collect();

    Ok(Json(ChooseResponse {
        correlation_id: command.correlation_id,
        choice: resolution.label,
        deltas: resolution.deltas,
        steps,
    }))
}

/// POST /drag
async fn drag(
    State(state): State<AppState>,
    Json(request): Json<OffsetRequest>,
) -> Json<DragResponse> {
    let revert = state.reader.lock().await.drag_to(request.offset);
    Json(DragResponse { revert })
}

/// POST /settle
#[instrument(skip(state, request), fields(offset = request.offset))]
async fn settle(
    State(state): State<AppState>,
    Json(request): Json<OffsetRequest>,
) -> Result<Json<SettleResponse>, ApiError> {
    let command = SettleScroll {
        correlation_id: Uuid::new_v4(),
        offset: request.offset,
    };

    let outcome = state.reader.lock().await.settle(&command)?;
    // A cancelled sequence leaves the driver waiting on a stale deadline.
    state.wake_playback();

    let response = match outcome {
        SettleOutcome::Moved { to, .. } => SettleResponse {
            outcome: "moved",
            page: to,
            scroll: None,
        },
        SettleOutcome::HeldAtChoice { to, scroll, .. } => SettleResponse {
            outcome: "held_at_choice",
            page: to,
            scroll: Some(scroll),
        },
        SettleOutcome::SnappedBack(scroll) => SettleResponse {
            outcome: "snapped_back",
            page: scroll.page,
            scroll: Some(scroll),
        },
        SettleOutcome::Stayed(page) => SettleResponse {
            outcome: "stayed",
            page,
            scroll: None,
        },
    };
    Ok(Json(response))
}

/// POST /orientation
async fn change_orientation(
    State(state): State<AppState>,
    Json(request): Json<OrientationRequest>,
) -> Json<ScrollCommand> {
    let command = ChangeOrientation {
        correlation_id: Uuid::new_v4(),
        orientation: request.orientation,
    };
    Json(state.reader.lock().await.change_orientation(&command))
}

/// POST /viewport
async fn resize(
    State(state): State<AppState>,
    Json(request): Json<Viewport>,
) -> Result<Json<ScrollCommand>, ApiError> {
    let viewport = Viewport::new(request.width, request.height)?;
    Ok(Json(state.reader.lock().await.resize(viewport)))
}

/// POST /volume
async fn set_volume(
    State(state): State<AppState>,
    Json(request): Json<VolumeRequest>,
) -> Json<VolumeResponse> {
    let volume = state
        .reader
        .lock()
        .await
        .set_music_volume(request.volume, state.audio.as_ref())
        .await;
    Json(VolumeResponse { volume })
}

/// POST /reset
async fn reset(State(state): State<AppState>) -> Result<Json<ScrollCommand>, ApiError> {
    let command = ResetProgress {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling reset_progress command");

    let scroll = state.reader.lock().await.reset(&command)?;
    state.wake_playback();
    Ok(Json(scroll))
}

/// Returns the router for the reader.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reader))
        .route("/choose", post(choose))
        .route("/drag", post(drag))
        .route("/settle", post(settle))
        .route("/orientation", post(change_orientation))
        .route("/viewport", post(resize))
        .route("/volume", post(set_volume))
        .route("/reset", post(reset))
}
