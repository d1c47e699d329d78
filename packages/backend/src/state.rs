use std::sync::Arc;
use std::time::{Instant, SystemTime};

use wink_cursor_core::Pointer;

use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::sessions::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    clock: Arc<dyn Clock>,
    config: Arc<Config>,
    sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// `config.cursor` must already carry the final screen size.
    pub fn new(config: Config, pointer: Arc<dyn Pointer>) -> Self {
        Self::with_clock(config, pointer, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(config: Config, pointer: Arc<dyn Pointer>, clock: Arc<dyn Clock>) -> Self {
        let sessions = SessionRegistry::new(config.wink, config.cursor, pointer, config.session_idle_timeout);
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            clock,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }

    /// Server-side seconds; the clock every detector timer runs on.
    pub fn now_secs(&self) -> f64 {
        self.clock.now_secs()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.sessions)
    }
}
