//! Session status and attendance configuration.

use serde::{Deserialize, Serialize};

/// Session status resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Minutes after the nominal end during which a session is still live.
    #[serde(default = "default_grace")]
    pub grace_minutes: i64,
    /// How often clients should re-poll a time-derived status, in seconds.
    #[serde(default = "default_status_poll")]
    pub status_poll_seconds: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            grace_minutes: default_grace(),
            status_poll_seconds: default_status_poll(),
        }
    }
}

/// Attendance log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Open records older than this many hours are closed by the worker.
    #[serde(default = "default_auto_close")]
    pub auto_close_after_hours: i64,
    /// Cron expression (with seconds) for the auto-close job.
    #[serde(default = "default_auto_close_cron")]
    pub auto_close_cron: String,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            auto_close_after_hours: default_auto_close(),
            auto_close_cron: default_auto_close_cron(),
        }
    }
}

fn default_grace() -> i64 {
    30
}

fn default_status_poll() -> u64 {
    30
}

fn default_auto_close() -> i64 {
    12
}

fn default_auto_close_cron() -> String {
    "0 */15 * * * *".to_string()
}
