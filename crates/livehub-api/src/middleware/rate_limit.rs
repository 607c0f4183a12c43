//! Sliding-window rate limiter middleware.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use livehub_core::config::{RateLimitConfig, RouteLimit};

use crate::error::ApiError;
use crate::extractors::client::client_identity;

/// In-memory sliding-window limiter keyed by `"{action}:{client}"`.
///
/// Each key holds the instants of its admitted requests. Per-process only:
/// several instances behind a load balancer each enforce their own window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    hits: Arc<DashMap<String, VecDeque<Instant>>>,
    retention: Duration,
}

impl RateLimiter {
    pub fn new(retention: Duration) -> Self {
        Self {
            hits: Arc::new(DashMap::new()),
            retention,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.retention_seconds))
    }

    /// Admit one request for `key` unless `max_requests` were already
    /// admitted within `window`.
    pub fn admit(&self, key: &str, max_requests: usize, window: Duration) -> bool {
        self.admit_at(key, max_requests, window, Instant::now())
    }

    pub fn admit_at(&self, key: &str, max_requests: usize, window: Duration, now: Instant) -> bool {
        // The entry guard holds the shard lock for the whole prune/append.
        let mut entry = self.hits.entry(key.to_string()).or_default();
        while entry
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= window)
        {
            entry.pop_front();
        }
        if entry.len() >= max_requests {
            return false;
        }
        entry.push_back(now);
        true
    }

    /// Drop keys whose newest hit is older than the retention window.
    /// Returns how many keys were removed.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.hits.len();
        self.hits.retain(|_, hits| {
            hits.back()
                .is_some_and(|t| now.saturating_duration_since(*t) < self.retention)
        });
        before.saturating_sub(self.hits.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.hits.len()
    }

    /// Sweep every `interval` until `cancel` flips to true.
    pub fn spawn_sweeper(&self, interval: Duration, mut cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    changed = cancel.changed() => {
                        if changed.is_err() || *cancel.borrow() {
                            tracing::debug!("Rate limiter sweeper stopped");
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let removed = limiter.sweep_at(Instant::now());
                        if removed > 0 {
                            tracing::debug!(removed, "Swept idle rate limit keys");
                        }
                    }
                }
            }
        })
    }
}

/// One rate-limited route: the shared limiter plus the route's budget.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    pub limiter: RateLimiter,
    pub action: &'static str,
    pub limit: RouteLimit,
    pub enabled: bool,
}

impl RouteGuard {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.limit.window_ms)
    }
}

/// Refuses the request with 429 when the client's budget for the route is
/// spent.
pub async fn enforce(
    State(guard): State<RouteGuard>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if guard.enabled {
        let client = client_identity(request.headers(), request.extensions());
        let key = format!("{}:{}", guard.action, client);
        if !guard
            .limiter
            .admit(&key, guard.limit.max_requests, guard.window())
        {
            tracing::warn!(action = guard.action, client = %client, "Rate limit exceeded");
            return Err(ApiError::rate_limited(guard.window()));
        }
    }
    Ok(next.run(request).await)
}
