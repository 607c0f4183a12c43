//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use livehub_core::error::AppError;

use crate::jobs::AttendanceAutoClose;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Attendance auto-close on `schedule` (cron with seconds).
    pub async fn register_attendance_auto_close(
        &self,
        schedule: &str,
        job: AttendanceAutoClose,
    ) -> Result<(), AppError> {
        let cron = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                tracing::debug!("Running attendance auto-close");
                job.run().await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid attendance auto-close schedule '{schedule}': {e}"
            ))
        })?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add attendance auto-close schedule: {e}"))
        })?;

        tracing::info!(schedule = %schedule, "Registered: attendance_auto_close");
        Ok(())
    }
}
