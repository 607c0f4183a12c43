//! Per-route admission control configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sliding-window rate limits and the sweep that bounds their memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether admission control is applied at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Meeting-token issuance.
    #[serde(default = "default_meeting_token")]
    pub meeting_token: RouteLimit,
    /// Sending a live action into a room.
    #[serde(default = "default_send_action")]
    pub send_action: RouteLimit,
    /// Saving a chat message.
    #[serde(default = "default_chat")]
    pub chat: RouteLimit,
    /// Seconds between sweeps of idle keys.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Keys whose newest timestamp is older than this are dropped by the sweep.
    #[serde(default = "default_retention")]
    pub retention_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            meeting_token: default_meeting_token(),
            send_action: default_send_action(),
            chat: default_chat(),
            sweep_interval_seconds: default_sweep_interval(),
            retention_seconds: default_retention(),
        }
    }
}

impl RateLimitConfig {
    /// Every limited route with its configuration key.
    pub fn routes(&self) -> [(&'static str, RouteLimit); 3] {
        [
            ("meeting_token", self.meeting_token),
            ("send_action", self.send_action),
            ("chat", self.chat),
        ]
    }

    /// The sweep must never drop a key whose window is still open.
    pub fn validate(&self) -> Result<(), AppError> {
        let retention_ms = self.retention_seconds.saturating_mul(1000);
        for (name, limit) in self.routes() {
            if limit.window_ms == 0 {
                return Err(AppError::configuration(format!(
                    "rate_limit.{name}.window_ms must be positive"
                )));
            }
            if limit.window_ms > retention_ms {
                return Err(AppError::configuration(format!(
                    "rate_limit.{name}.window_ms ({}) exceeds rate_limit.retention_seconds ({})",
                    limit.window_ms, self.retention_seconds
                )));
            }
        }
        Ok(())
    }
}

/// Limit for a single route: at most `max_requests` within `window_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLimit {
    /// Admissions allowed inside one window.
    pub max_requests: usize,
    /// Trailing window length in milliseconds.
    pub window_ms: u64,
}

impl RouteLimit {
    /// Limit of `max_requests` per minute.
    pub const fn per_minute(max_requests: usize) -> Self {
        Self {
            max_requests,
            window_ms: 60_000,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_meeting_token() -> RouteLimit {
    RouteLimit::per_minute(20)
}

fn default_send_action() -> RouteLimit {
    RouteLimit::per_minute(30)
}

fn default_chat() -> RouteLimit {
    RouteLimit::per_minute(60)
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_retention() -> u64 {
    300
}
