mod session_cleanup;

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use crate::sessions::SessionRegistry;
use crate::state::AppState;

pub use session_cleanup::evict_idle_sessions;

pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    state: AppState,
    cleanup_schedule: String,
}

impl WorkerManager {
    pub async fn new(state: AppState) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await.map_err(WorkerError::Scheduler)?;
        let cleanup_schedule = state.config().session_cleanup_schedule.clone();
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            state,
            cleanup_schedule,
        })
    }

    pub async fn start(&self) -> Result<(), WorkerError> {
        let scheduler = self.scheduler.lock().await;

        {
            let state = self.state.clone();
            let job = Job::new_async(self.cleanup_schedule.as_str(), move |_uuid, _lock| {
                let sessions: Arc<SessionRegistry> = state.sessions();
                let now = state.now_secs();
                Box::pin(async move {
                    evict_idle_sessions(&sessions, now);
                })
            })
            .map_err(WorkerError::Scheduler)?;
            scheduler.add(job).await.map_err(WorkerError::Scheduler)?;
            info!(schedule = %self.cleanup_schedule, "Session cleanup worker scheduled");
        }

        scheduler.start().await.map_err(WorkerError::Scheduler)?;
        info!("All workers started");

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping workers...");

        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "Error shutting down scheduler");
        }

        info!("Workers stopped");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}
