//! Conferencing provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for the third-party video-conferencing REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceConfig {
    /// Base URL of the provider API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer API key. Supply through `LIVEHUB__CONFERENCE__API_KEY`.
    #[serde(default)]
    pub api_key: String,
    /// Upper bound for a whole provider call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Upper bound for establishing a connection, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Lifetime of newly created rooms, in hours.
    #[serde(default = "default_room_expiry")]
    pub room_expiry_hours: i64,
    /// Lifetime of meeting tokens, in hours.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_hours: i64,
    /// Participant cap for call-mode rooms when the session sets none.
    #[serde(default = "default_max_participants")]
    pub default_max_participants: u32,
    /// Age after which an unfinished room claim may be taken over, in seconds.
    #[serde(default = "default_room_claim_ttl")]
    pub room_claim_ttl_seconds: u64,
}

impl ConferenceConfig {
    /// How long a room claim shields an in-flight creation.
    pub fn room_claim_ttl(&self) -> chrono::Duration {
        i64::try_from(self.room_claim_ttl_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// A claim must outlive the slowest provider call it guards.
    pub fn validate(&self) -> Result<(), AppError> {
        let slowest = self
            .request_timeout_seconds
            .saturating_add(self.connect_timeout_seconds);
        if self.room_claim_ttl_seconds <= slowest {
            return Err(AppError::configuration(format!(
                "conference.room_claim_ttl_seconds ({}) must exceed request plus connect timeout ({slowest})",
                self.room_claim_ttl_seconds
            )));
        }
        Ok(())
    }
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            room_expiry_hours: default_room_expiry(),
            token_expiry_hours: default_token_expiry(),
            default_max_participants: default_max_participants(),
            room_claim_ttl_seconds: default_room_claim_ttl(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.daily.co/v1".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_room_expiry() -> i64 {
    24
}

fn default_token_expiry() -> i64 {
    4
}

fn default_max_participants() -> u32 {
    50
}

fn default_room_claim_ttl() -> u64 {
    60
}
