use std::time::Instant;

use tracing::{debug, info};

use crate::sessions::SessionRegistry;

#[derive(Debug, Default)]
struct CleanupStats {
    evicted_sessions: usize,
    remaining_sessions: usize,
    duration_secs: f64,
}

/// Drops tracking sessions that have not sent a frame within the idle
/// timeout. Returns how many were removed.
pub fn evict_idle_sessions(sessions: &SessionRegistry, now: f64) -> usize {
    if sessions.is_empty() {
        return 0;
    }

    let start = Instant::now();
    debug!("Starting session cleanup cycle");

    let mut stats = CleanupStats::default();
    stats.evicted_sessions = sessions.evict_idle(now);
    stats.remaining_sessions = sessions.len();
    stats.duration_secs = start.elapsed().as_secs_f64();

    if stats.evicted_sessions > 0 {
        info!(
            evicted_sessions = stats.evicted_sessions,
            remaining_sessions = stats.remaining_sessions,
            idle_timeout_secs = sessions.idle_timeout().as_secs(),
            duration_secs = format!("{:.3}", stats.duration_secs),
            "Session cleanup completed"
        );
    } else {
        debug!(remaining_sessions = stats.remaining_sessions, "No idle sessions");
    }

    stats.evicted_sessions
}
