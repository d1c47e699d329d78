use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wink_cursor_core::{mirror_face, FrameOutcome, FrameSize, Landmark, SessionStats, WinkState};

use crate::response::{ok, AppError};
use crate::sessions::is_valid_session_id;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(end_session))
        .route("/sessions/:id/frames", post(submit_frame))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameBody {
    frame_width: u32,
    frame_height: u32,
    /// `null` when the face mesh found no face in this frame.
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
    /// Set when the client did not flip the camera image before running the
    /// face mesh; the mesh is then mirrored, eye indices included.
    #[serde(default)]
    mirrored: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSessionDto {
    session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameResponseDto {
    session_id: String,
    created: bool,
    #[serde(flatten)]
    outcome: FrameOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    session_id: String,
    created_at: f64,
    last_seen: f64,
    idle_secs: f64,
    stats: SessionStats,
    wink: WinkState,
    last_click_time: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndedSessionDto {
    session_id: String,
    ended: bool,
}

fn require_session_id(id: &str) -> Result<(), AppError> {
    if is_valid_session_id(id) {
        Ok(())
    } else {
        Err(AppError::validation(
            "session id must be 1-128 characters of letters, digits, '-' or '_'",
        ))
    }
}

fn validate_frame(body: &FrameBody) -> Result<(), AppError> {
    if body.frame_width == 0 || body.frame_height == 0 {
        return Err(AppError::validation("frameWidth and frameHeight must be positive"));
    }
    if let Some(landmarks) = &body.landmarks {
        if landmarks.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(AppError::validation("landmark coordinates must be finite numbers"));
        }
    }
    Ok(())
}

async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = Uuid::new_v4().to_string();
    state.sessions().get_or_create(&session_id, state.now_secs());
    (StatusCode::CREATED, ok(CreatedSessionDto { session_id }))
}

async fn submit_frame(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FrameBody>,
) -> Result<impl IntoResponse, AppError> {
    require_session_id(&id)?;
    validate_frame(&body)?;

    let size = FrameSize::new(body.frame_width, body.frame_height);
    let landmarks: Option<Vec<Landmark>> = if body.mirrored {
        body.landmarks.as_deref().map(mirror_face)
    } else {
        body.landmarks
    };

    // Pointer devices may block on OS input calls; keep them off the runtime.
    let registry = state.sessions();
    let clock = state.clone();
    let session_id = id.clone();
    let (outcome, created) = tokio::task::spawn_blocking(move || {
        registry.with_session(&session_id, clock.now_secs(), |entry| {
            // Read the clock under the session lock so frames keep arrival order.
            let now = clock.now_secs();
            entry.last_seen = now;
            entry.session.process_frame(landmarks.as_deref(), size, now)
        })
    })
    .await
    .map_err(|e| AppError::internal(format!("frame processing task failed: {e}")))?;

    if let Some(wink) = outcome.wink {
        tracing::info!(
            session_id = %id,
            wink = wink.as_str(),
            clicked = outcome.clicked.is_some(),
            "wink event"
        );
    }

    Ok(ok(FrameResponseDto {
        session_id: id,
        created,
        outcome,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state
        .sessions()
        .get(&id)
        .ok_or_else(|| AppError::not_found("tracking session not found"))?;

    // The entry lock may be held by a frame waiting on the pointer device.
    let clock = state.clone();
    let data = tokio::task::spawn_blocking(move || {
        let guard = entry.lock();
        let now = clock.now_secs();
        SessionDto {
            session_id: id,
            created_at: guard.created_at,
            last_seen: guard.last_seen,
            idle_secs: (now - guard.last_seen).max(0.0),
            stats: guard.session.stats(),
            wink: *guard.session.wink_state(),
            last_click_time: guard.session.cursor().last_click_time(),
        }
    })
    .await
    .map_err(|e| AppError::internal(format!("session snapshot task failed: {e}")))?;

    Ok(ok(data))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.sessions().remove(&id) {
        return Err(AppError::not_found("tracking session not found"));
    }

    Ok(ok(EndedSessionDto {
        session_id: id,
        ended: true,
    }))
}
