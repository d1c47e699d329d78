use std::time::Instant;

use parking_lot::Mutex;

/// Time source for every detector and controller timer, in seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> f64;
}

/// Seconds since the clock was created, read from `Instant`.
#[derive(Debug)]
pub struct MonotonicClock {
    started_at: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, secs: f64) {
        *self.now.lock() += secs;
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        *self.now.lock()
    }
}
