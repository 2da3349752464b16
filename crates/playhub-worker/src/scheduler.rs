//! Cron scheduler for the periodic expiry sweep.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use playhub_core::config::WorkerConfig;
use playhub_core::error::AppError;
use playhub_session::SessionSweeper;

/// Cron-based scheduler driving the session expiry sweep.
pub struct SweepScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Sweeper invoked on each tick.
    sweeper: Arc<SessionSweeper>,
    /// Worker configuration.
    config: WorkerConfig,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler")
            .field("config", &self.config)
            .finish()
    }
}

impl SweepScheduler {
    /// Create a new sweep scheduler.
    pub async fn new(sweeper: Arc<SessionSweeper>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            sweeper,
            config,
        })
    }

    /// Register the expiry sweep task.
    ///
    /// A failed sweep tick is logged and retried on the next tick; the
    /// scheduler itself never gives up.
    pub async fn register_sweep_task(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            info!("Expiry sweep disabled by configuration");
            return Ok(());
        }

        let sweeper = Arc::clone(&self.sweeper);
        let job = CronJob::new_async(self.config.sweep_schedule.as_str(), move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            Box::pin(async move {
                if let Err(e) = sweeper.run_sweep().await {
                    error!(error = %e, "Expiry sweep failed");
                }
            })
        })
        .map_err(|e| AppError::configuration(format!("Invalid sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep task: {e}")))?;

        info!(
            schedule = %self.config.sweep_schedule,
            "Registered: session expiry sweep"
        );
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Sweep scheduler started");
        Ok(())
    }

    /// Shut down the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shut down scheduler: {e}")))?;

        info!("Sweep scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playhub_core::config::SessionConfig;
    use playhub_core::error::ErrorKind;
    use playhub_session::SessionStore;

    fn sweeper() -> Arc<SessionSweeper> {
        let store = Arc::new(SessionStore::in_memory(SessionConfig::default()));
        Arc::new(SessionSweeper::new(store))
    }

    #[tokio::test]
    async fn test_invalid_schedule_rejected() {
        let config = WorkerConfig {
            enabled: true,
            sweep_schedule: "not a cron expression".to_string(),
        };
        let scheduler = SweepScheduler::new(sweeper(), config).await.unwrap();

        let err = scheduler.register_sweep_task().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_register_start_shutdown() {
        let mut scheduler = SweepScheduler::new(sweeper(), WorkerConfig::default())
            .await
            .unwrap();

        scheduler.register_sweep_task().await.unwrap();
        scheduler.start().await.unwrap();
        scheduler.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_disabled_worker_registers_nothing() {
        let config = WorkerConfig {
            enabled: false,
            sweep_schedule: WorkerConfig::default().sweep_schedule,
        };
        let scheduler = SweepScheduler::new(sweeper(), config).await.unwrap();

        scheduler.register_sweep_task().await.unwrap();
    }
}
