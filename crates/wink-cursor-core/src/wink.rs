//! Wink detection
//!
//! A wink is a single-eye closure (EAR below threshold while the other eye
//! stays open) held for at least `min_wink_duration` seconds. Each eye runs
//! its own closed-since timer; a shared cooldown suppresses re-firing right
//! after a reported wink, and `last_detected_wink` keeps a sustained closure
//! from firing twice until both eyes reopen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ear::{compute_ear, EarReading};
use crate::landmarks::{FrameSize, Landmark};

pub const DEFAULT_BLINK_THRESHOLD: f64 = 0.25;
pub const DEFAULT_MIN_WINK_DURATION: f64 = 0.3;
pub const DEFAULT_WINK_COOLDOWN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wink {
    Left,
    Right,
}

impl Wink {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinkConfig {
    /// EAR below which an eye counts as closed.
    pub blink_threshold: f64,
    /// Seconds a single-eye closure must be held.
    pub min_wink_duration: f64,
    /// Seconds after a reported wink during which detection is paused.
    pub wink_cooldown: f64,
}

impl Default for WinkConfig {
    fn default() -> Self {
        Self {
            blink_threshold: DEFAULT_BLINK_THRESHOLD,
            min_wink_duration: DEFAULT_MIN_WINK_DURATION,
            wink_cooldown: DEFAULT_WINK_COOLDOWN,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinkState {
    pub left_eye_closed_since: Option<f64>,
    pub right_eye_closed_since: Option<f64>,
    pub last_detected_wink: Option<Wink>,
    pub last_wink_time: Option<f64>,
}

impl WinkState {
    fn closed_since_mut(&mut self, eye: Wink) -> &mut Option<f64> {
        match eye {
            Wink::Left => &mut self.left_eye_closed_since,
            Wink::Right => &mut self.right_eye_closed_since,
        }
    }
}

/// Temporal wink detector. One instance must live for the whole tracking
/// session; a fresh instance per frame never accumulates closed time.
#[derive(Debug, Clone, Default)]
pub struct WinkDetector {
    config: WinkConfig,
    state: WinkState,
}

impl WinkDetector {
    pub fn new(config: WinkConfig) -> Self {
        Self {
            config,
            state: WinkState::default(),
        }
    }

    pub fn state(&self) -> &WinkState {
        &self.state
    }

    pub fn detect(&mut self, landmarks: &[Landmark], size: FrameSize, now: f64) -> Option<Wink> {
        let reading = compute_ear(landmarks, size);
        self.update(reading, now)
    }

    /// Advances the state machine by one frame of EAR readings.
    pub fn update(&mut self, reading: EarReading, now: f64) -> Option<Wink> {
        if let Some(last) = self.state.last_wink_time {
            if now - last < self.config.wink_cooldown {
                return None;
            }
        }

        let threshold = self.config.blink_threshold;
        let left_open = reading.left_ear >= threshold;
        let right_open = reading.right_ear >= threshold;

        let mut fired = None;
        if self.track_eye(Wink::Left, !left_open && right_open, now) {
            fired = Some(Wink::Left);
        }
        if self.track_eye(Wink::Right, !right_open && left_open, now) {
            fired = Some(Wink::Right);
        }

        if let Some(eye) = fired {
            self.state.last_detected_wink = Some(eye);
            self.state.last_wink_time = Some(now);
            debug!(
                eye = eye.as_str(),
                left_ear = reading.left_ear,
                right_ear = reading.right_ear,
                "wink detected"
            );
        }

        if left_open && right_open {
            self.state.last_detected_wink = None;
        }

        fired
    }

    /// Returns true when `eye` has been held closed long enough to fire.
    fn track_eye(&mut self, eye: Wink, closed: bool, now: f64) -> bool {
        let min_duration = self.config.min_wink_duration;
        let last_detected = self.state.last_detected_wink;
        let closed_since = self.state.closed_since_mut(eye);

        if !closed {
            *closed_since = None;
            return false;
        }

        match *closed_since {
            None => {
                *closed_since = Some(now);
                false
            }
            Some(start) => now - start >= min_duration && last_detected != Some(eye),
        }
    }
}
