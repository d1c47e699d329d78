//! Per-frame orchestration
//!
//! Gaze estimation drives the cursor position, wink detection drives
//! clicks. The two detectors never see each other's output. Pointer
//! failures are reported on the outcome and never abort the frame.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::cursor::{CursorConfig, CursorController, ScreenPoint};
use crate::gaze::{GazeEstimator, GazeState};
use crate::landmarks::{FrameSize, Landmark};
use crate::pointer::{MouseButton, Pointer};
use crate::wink::{Wink, WinkConfig, WinkDetector, WinkState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerActionKind {
    Move,
    Click,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionFailure {
    pub action: PointerActionKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutcome {
    /// Present only when both iris centers were found this frame.
    pub gaze: Option<GazeState>,
    pub wink: Option<Wink>,
    pub cursor: Option<ScreenPoint>,
    pub clicked: Option<MouseButton>,
    pub failures: Vec<ActionFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub frames_processed: u64,
    pub frames_without_face: u64,
    pub winks_detected: u64,
    pub clicks_issued: u64,
}

/// Detector and controller state for one tracking session.
#[derive(Debug)]
pub struct TrackingSession {
    gaze: GazeEstimator,
    wink: WinkDetector,
    cursor: CursorController,
    stats: SessionStats,
}

impl TrackingSession {
    pub fn new(wink: WinkConfig, cursor: CursorConfig, pointer: Arc<dyn Pointer>) -> Self {
        Self {
            gaze: GazeEstimator::new(),
            wink: WinkDetector::new(wink),
            cursor: CursorController::new(cursor, pointer),
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn wink_state(&self) -> &WinkState {
        self.wink.state()
    }

    pub fn cursor(&self) -> &CursorController {
        &self.cursor
    }

    /// Runs one frame. `None` or empty landmarks mean no face was found:
    /// neither detector is invoked and no state changes.
    pub fn process_frame(&mut self, landmarks: Option<&[Landmark]>, size: FrameSize, now: f64) -> FrameOutcome {
        self.stats.frames_processed += 1;

        let Some(landmarks) = landmarks.filter(|l| !l.is_empty()) else {
            self.stats.frames_without_face += 1;
            return FrameOutcome::default();
        };

        let mut outcome = FrameOutcome::default();

        let gaze = self.gaze.estimate(landmarks, size);
        if let Some((x, y)) = gaze.iris_target(size) {
            outcome.gaze = Some(gaze);
            match self.cursor.move_to(x, y) {
                Ok(point) => outcome.cursor = point,
                Err(e) => {
                    warn!(error = %e, "pointer move failed");
                    outcome.failures.push(ActionFailure {
                        action: PointerActionKind::Move,
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(wink) = self.wink.detect(landmarks, size, now) {
            self.stats.winks_detected += 1;
            outcome.wink = Some(wink);
            match self.cursor.click_if_wink(wink, now) {
                Ok(Some(button)) => {
                    self.stats.clicks_issued += 1;
                    outcome.clicked = Some(button);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, wink = wink.as_str(), "pointer click failed");
                    outcome.failures.push(ActionFailure {
                        action: PointerActionKind::Click,
                        message: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}
