//! Pointer devices available to the service.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use wink_cursor_core::{MouseButton, Pointer, PointerError};

use crate::config::{Config, PointerKind};

#[derive(Debug, Error)]
pub enum PointerInitError {
    #[error("OS pointer requested but the binary was built without the `os-pointer` feature")]
    FeatureDisabled,
    #[error("failed to open OS pointer: {0}")]
    Open(String),
}

/// Logs every action instead of touching a real cursor.
#[derive(Debug, Default)]
pub struct LogPointer;

impl Pointer for LogPointer {
    fn move_to(&self, x: i32, y: i32) -> Result<(), PointerError> {
        tracing::trace!(x, y, "pointer move");
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<(), PointerError> {
        info!(button = button.as_str(), "pointer click");
        Ok(())
    }
}

pub struct PointerDevice {
    pub pointer: Arc<dyn Pointer>,
    /// Display size reported by the device, when it knows one.
    pub display_size: Option<(u32, u32)>,
}

pub fn open_pointer(config: &Config) -> Result<PointerDevice, PointerInitError> {
    match config.pointer {
        PointerKind::Log => Ok(PointerDevice {
            pointer: Arc::new(LogPointer),
            display_size: None,
        }),
        #[cfg(feature = "os-pointer")]
        PointerKind::Os => {
            let os = os::OsPointer::spawn()?;
            let display_size = os.display_size();
            Ok(PointerDevice {
                pointer: Arc::new(os),
                display_size,
            })
        }
        #[cfg(not(feature = "os-pointer"))]
        PointerKind::Os => Err(PointerInitError::FeatureDisabled),
    }
}

#[cfg(feature = "os-pointer")]
mod os {
    use std::sync::mpsc;
    use std::thread;

    use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
    use parking_lot::Mutex;
    use wink_cursor_core::{MouseButton, Pointer, PointerError};

    use super::PointerInitError;

    enum Command {
        Move(i32, i32, mpsc::Sender<Result<(), String>>),
        Click(MouseButton, mpsc::Sender<Result<(), String>>),
    }

    /// The enigo handle lives on its own thread; callers talk to it over a
    /// channel so the pointer can be shared across sessions.
    pub struct OsPointer {
        commands: Mutex<mpsc::Sender<Command>>,
        display: Option<(u32, u32)>,
    }

    impl OsPointer {
        pub fn spawn() -> Result<Self, PointerInitError> {
            let (command_tx, command_rx) = mpsc::channel::<Command>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<Option<(u32, u32)>, String>>();

            thread::Builder::new()
                .name("os-pointer".to_string())
                .spawn(move || {
                    let mut enigo = match Enigo::new(&Settings::default()) {
                        Ok(enigo) => enigo,
                        Err(e) => {
                            let _ = ready_tx.send(Err(format!("{e:?}")));
                            return;
                        }
                    };
                    let display = enigo
                        .main_display()
                        .ok()
                        .and_then(|(w, h)| Some((u32::try_from(w).ok()?, u32::try_from(h).ok()?)));
                    let _ = ready_tx.send(Ok(display));

                    for command in command_rx {
                        match command {
                            Command::Move(x, y, reply) => {
                                let result = enigo
                                    .move_mouse(x, y, Coordinate::Abs)
                                    .map_err(|e| format!("{e:?}"));
                                let _ = reply.send(result);
                            }
                            Command::Click(button, reply) => {
                                let button = match button {
                                    MouseButton::Left => Button::Left,
                                    MouseButton::Right => Button::Right,
                                };
                                let result = enigo
                                    .button(button, Direction::Click)
                                    .map_err(|e| format!("{e:?}"));
                                let _ = reply.send(result);
                            }
                        }
                    }
                })
                .map_err(|e| PointerInitError::Open(e.to_string()))?;

            let display = ready_rx
                .recv()
                .map_err(|e| PointerInitError::Open(e.to_string()))?
                .map_err(PointerInitError::Open)?;

            Ok(Self {
                commands: Mutex::new(command_tx),
                display,
            })
        }

        pub fn display_size(&self) -> Option<(u32, u32)> {
            self.display
        }

        /// Outer error: the pointer thread is gone. Inner error: enigo refused
        /// the command.
        fn send(
            &self,
            build: impl FnOnce(mpsc::Sender<Result<(), String>>) -> Command,
        ) -> Result<Result<(), String>, PointerError> {
            let stopped = || PointerError::Unavailable("pointer thread stopped".to_string());
            let (reply_tx, reply_rx) = mpsc::channel();
            self.commands
                .lock()
                .send(build(reply_tx))
                .map_err(|_| stopped())?;
            reply_rx.recv().map_err(|_| stopped())
        }
    }

    impl Pointer for OsPointer {
        fn move_to(&self, x: i32, y: i32) -> Result<(), PointerError> {
            self.send(|reply| Command::Move(x, y, reply))?
                .map_err(|message| PointerError::Move { x, y, message })
        }

        fn click(&self, button: MouseButton) -> Result<(), PointerError> {
            self.send(|reply| Command::Click(button, reply))?
                .map_err(|message| PointerError::Click { button, message })
        }
    }
}
