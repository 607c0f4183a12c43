//! Closes attendance records that were never left.

use chrono::Duration;

use livehub_core::config::AttendanceConfig;
use livehub_service::AttendanceService;

/// Auto-close job: any record open longer than the configured age is
/// closed and flagged `auto_closed`.
#[derive(Debug, Clone)]
pub struct AttendanceAutoClose {
    attendance: AttendanceService,
    max_open: Duration,
}

impl AttendanceAutoClose {
    pub fn new(attendance: AttendanceService, config: &AttendanceConfig) -> Self {
        Self {
            attendance,
            max_open: Duration::hours(config.auto_close_after_hours),
        }
    }

    /// Run once. Failures are logged; the next tick tries again.
    pub async fn run(&self) -> u64 {
        match self.attendance.close_stale(self.max_open).await {
            Ok(closed) => {
                tracing::debug!(closed, "Attendance auto-close finished");
                closed
            }
            Err(e) => {
                tracing::error!(error = %e, "Attendance auto-close failed");
                0
            }
        }
    }
}
