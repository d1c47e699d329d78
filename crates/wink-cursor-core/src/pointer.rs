use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wink::Wink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl From<Wink> for MouseButton {
    fn from(wink: Wink) -> Self {
        match wink {
            Wink::Left => Self::Left,
            Wink::Right => Self::Right,
        }
    }
}

#[derive(Debug, Error)]
pub enum PointerError {
    #[error("move to ({x}, {y}) failed: {message}")]
    Move { x: i32, y: i32, message: String },
    #[error("{} click failed: {message}", .button.as_str())]
    Click { button: MouseButton, message: String },
    #[error("pointer device unavailable: {0}")]
    Unavailable(String),
}

/// OS-level pointer capability. Implementations own whatever device handle
/// they need; callers only see absolute moves and single clicks.
pub trait Pointer: Send + Sync {
    fn move_to(&self, x: i32, y: i32) -> Result<(), PointerError>;

    fn click(&self, button: MouseButton) -> Result<(), PointerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PointerAction {
    MoveTo { x: i32, y: i32 },
    Click { button: MouseButton },
}

/// Pointer that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingPointer {
    actions: Mutex<Vec<PointerAction>>,
}

impl RecordingPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<PointerAction> {
        self.actions.lock().clone()
    }

    pub fn clicks(&self) -> Vec<MouseButton> {
        self.actions
            .lock()
            .iter()
            .filter_map(|action| match action {
                PointerAction::Click { button } => Some(*button),
                PointerAction::MoveTo { .. } => None,
            })
            .collect()
    }

    pub fn last_position(&self) -> Option<(i32, i32)> {
        self.actions.lock().iter().rev().find_map(|action| match action {
            PointerAction::MoveTo { x, y } => Some((*x, *y)),
            PointerAction::Click { .. } => None,
        })
    }

    pub fn clear(&self) {
        self.actions.lock().clear();
    }
}

impl Pointer for RecordingPointer {
    fn move_to(&self, x: i32, y: i32) -> Result<(), PointerError> {
        self.actions.lock().push(PointerAction::MoveTo { x, y });
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), PointerError> {
        self.actions.lock().push(PointerAction::Click { button });
        Ok(())
    }
}
