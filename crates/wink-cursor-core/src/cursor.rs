use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pointer::{MouseButton, Pointer, PointerError};
use crate::wink::Wink;

pub const DEFAULT_CLICK_COOLDOWN: f64 = 1.0;
pub const DEFAULT_SMOOTHING: f64 = 0.0;
pub const DEFAULT_SENSITIVITY: f64 = 1.0;
const MAX_SMOOTHING: f64 = 0.99;
const MIN_SENSITIVITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Minimum seconds between two issued clicks.
    pub click_cooldown: f64,
    /// 0 = jump to target, values towards 1 trail the previous position.
    pub smoothing: f64,
    /// Multiplier on the normalized target before clamping.
    pub sensitivity: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            click_cooldown: DEFAULT_CLICK_COOLDOWN,
            smoothing: DEFAULT_SMOOTHING,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl CursorConfig {
    /// Forces every field into its usable range.
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            screen_width: self.screen_width.max(1),
            screen_height: self.screen_height.max(1),
            click_cooldown: finite_or(self.click_cooldown, DEFAULT_CLICK_COOLDOWN).max(0.0),
            smoothing: finite_or(self.smoothing, DEFAULT_SMOOTHING).clamp(0.0, MAX_SMOOTHING),
            sensitivity: finite_or(self.sensitivity, DEFAULT_SENSITIVITY).max(MIN_SENSITIVITY),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

/// Control law from normalized gaze targets to pointer actions.
pub struct CursorController {
    config: CursorConfig,
    pointer: Arc<dyn Pointer>,
    last_click_time: Option<f64>,
    position: (f64, f64),
}

impl CursorController {
    pub fn new(config: CursorConfig, pointer: Arc<dyn Pointer>) -> Self {
        let config = config.sanitized();
        let position = (
            f64::from(config.screen_width) / 2.0,
            f64::from(config.screen_height) / 2.0,
        );
        Self {
            config,
            pointer,
            last_click_time: None,
            position,
        }
    }

    pub fn last_click_time(&self) -> Option<f64> {
        self.last_click_time
    }

    /// Screen point the next `move_to` would emit, without moving.
    pub fn target(&self, x_norm: f64, y_norm: f64) -> Option<(f64, f64)> {
        if !x_norm.is_finite() || !y_norm.is_finite() {
            return None;
        }

        let width = f64::from(self.config.screen_width);
        let height = f64::from(self.config.screen_height);
        let gain = 1.0 - self.config.smoothing;

        let target_x = (x_norm * self.config.sensitivity).clamp(0.0, 1.0) * width;
        let target_y = (y_norm * self.config.sensitivity).clamp(0.0, 1.0) * height;

        let x = self.position.0 + (target_x - self.position.0) * gain;
        let y = self.position.1 + (target_y - self.position.1) * gain;

        Some((x.clamp(0.0, width - 1.0), y.clamp(0.0, height - 1.0)))
    }

    /// Moves the pointer towards the normalized target. Non-finite input is
    /// ignored and yields `Ok(None)`.
    pub fn move_to(&mut self, x_norm: f64, y_norm: f64) -> Result<Option<ScreenPoint>, PointerError> {
        let Some((x, y)) = self.target(x_norm, y_norm) else {
            return Ok(None);
        };

        let point = ScreenPoint {
            x: x as i32,
            y: y as i32,
        };
        self.pointer.move_to(point.x, point.y)?;
        self.position = (x, y);
        Ok(Some(point))
    }

    /// Clicks the button matching `wink` unless a click was issued less than
    /// `click_cooldown` seconds ago. A failed click does not start the
    /// cooldown.
    pub fn click_if_wink(&mut self, wink: Wink, now: f64) -> Result<Option<MouseButton>, PointerError> {
        if let Some(last) = self.last_click_time {
            if now - last < self.config.click_cooldown {
                debug!(wink = wink.as_str(), since_last = now - last, "click suppressed by cooldown");
                return Ok(None);
            }
        }

        let button = MouseButton::from(wink);
        self.pointer.click(button)?;
        self.last_click_time = Some(now);
        Ok(Some(button))
    }
}

impl std::fmt::Debug for CursorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorController")
            .field("config", &self.config)
            .field("last_click_time", &self.last_click_time)
            .field("position", &self.position)
            .finish()
    }
}
