//! Schedule-derived session status with a moderator override.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use livehub_core::config::LiveConfig;
use livehub_entity::session::LiveStatus;

/// Minutes after the nominal end during which a session still reads live.
pub const DEFAULT_GRACE_MINUTES: i64 = 30;

/// Client re-poll interval for schedule-derived statuses.
pub const DEFAULT_REFRESH_SECONDS: u64 = 30;

/// Where a session sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Upcoming,
    Live,
    Past,
}

/// Grace and refresh settings for status resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub grace: Duration,
    pub refresh: StdDuration,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            grace: Duration::minutes(DEFAULT_GRACE_MINUTES),
            refresh: StdDuration::from_secs(DEFAULT_REFRESH_SECONDS),
        }
    }
}

impl From<&LiveConfig> for StatusPolicy {
    fn from(config: &LiveConfig) -> Self {
        Self {
            grace: Duration::try_minutes(config.grace_minutes).unwrap_or(Duration::MAX),
            refresh: StdDuration::from_secs(config.status_poll_seconds),
        }
    }
}

impl StatusPolicy {
    pub fn resolve(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        live_status: LiveStatus,
        now: DateTime<Utc>,
    ) -> SessionStatus {
        match live_status {
            LiveStatus::Live => SessionStatus::Live,
            LiveStatus::Ended => SessionStatus::Past,
            LiveStatus::Idle if now < start => SessionStatus::Upcoming,
            LiveStatus::Idle if self.within_grace(end, now) => SessionStatus::Live,
            LiveStatus::Idle => SessionStatus::Past,
        }
    }

    /// A cutoff beyond the representable range is never reached.
    fn within_grace(&self, end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        end.checked_add_signed(self.grace)
            .is_none_or(|cutoff| now <= cutoff)
    }

    /// How long a displayed status stays valid. An override is definitive
    /// until changed, so there is nothing to re-poll.
    pub fn refresh_hint(&self, live_status: LiveStatus) -> Option<StdDuration> {
        match live_status {
            LiveStatus::Idle => Some(self.refresh),
            LiveStatus::Live | LiveStatus::Ended => None,
        }
    }
}

/// Resolve with the default 30-minute grace.
pub fn resolve_status(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    live_status: LiveStatus,
    now: DateTime<Utc>,
) -> SessionStatus {
    StatusPolicy::default().resolve(start, end, live_status, now)
}

/// Re-poll interval under the default policy.
pub fn refresh_hint(live_status: LiveStatus) -> Option<StdDuration> {
    StatusPolicy::default().refresh_hint(live_status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now();
        (start, start + Duration::hours(1))
    }

    #[test]
    fn test_schedule_derived_status() {
        let (start, end) = window();
        let idle = LiveStatus::Idle;
        assert_eq!(
            resolve_status(start, end, idle, start - Duration::minutes(10)),
            SessionStatus::Upcoming
        );
        assert_eq!(resolve_status(start, end, idle, start), SessionStatus::Live);
        assert_eq!(
            resolve_status(start, end, idle, end + Duration::minutes(10)),
            SessionStatus::Live
        );
        assert_eq!(
            resolve_status(start, end, idle, end + Duration::minutes(30)),
            SessionStatus::Live
        );
        assert_eq!(
            resolve_status(start, end, idle, end + Duration::minutes(40)),
            SessionStatus::Past
        );
    }

    #[test]
    fn test_overrides_win() {
        let (start, end) = window();
        assert_eq!(
            resolve_status(start, end, LiveStatus::Live, start - Duration::days(30)),
            SessionStatus::Live
        );
        assert_eq!(
            resolve_status(start, end, LiveStatus::Live, end + Duration::days(30)),
            SessionStatus::Live
        );
        assert_eq!(
            resolve_status(start, end, LiveStatus::Ended, start + Duration::minutes(5)),
            SessionStatus::Past
        );
    }

    #[test]
    fn test_end_near_the_calendar_limit_stays_live() {
        let start = Utc::now();
        let end = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        assert_eq!(
            resolve_status(start, end, LiveStatus::Idle, start + Duration::hours(1)),
            SessionStatus::Live
        );

        let policy = StatusPolicy::from(&LiveConfig {
            grace_minutes: i64::MAX,
            status_poll_seconds: 10,
        });
        let (start, end) = window();
        assert_eq!(
            policy.resolve(start, end, LiveStatus::Idle, end + Duration::days(365)),
            SessionStatus::Live
        );
    }

    #[test]
    fn test_refresh_hint() {
        assert_eq!(
            refresh_hint(LiveStatus::Idle),
            Some(StdDuration::from_secs(30))
        );
        assert_eq!(refresh_hint(LiveStatus::Live), None);
        assert_eq!(refresh_hint(LiveStatus::Ended), None);
    }

    #[test]
    fn test_policy_from_config() {
        let policy = StatusPolicy::from(&LiveConfig {
            grace_minutes: 5,
            status_poll_seconds: 10,
        });
        let (start, end) = window();
        assert_eq!(
            policy.resolve(start, end, LiveStatus::Idle, end + Duration::minutes(10)),
            SessionStatus::Past
        );
        assert_eq!(
            policy.refresh_hint(LiveStatus::Idle),
            Some(StdDuration::from_secs(10))
        );
    }
}
