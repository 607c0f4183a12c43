//! # livehub-conference
//!
//! Clients for the hosted video-conferencing API. The HTTP provider talks
//! to the real service; the mock provider (feature `mock`) records calls
//! for tests.

pub mod providers;

use std::sync::Arc;

use livehub_core::config::ConferenceConfig;
use livehub_core::result::AppResult;
use livehub_core::traits::ConferenceProvider;

pub use providers::http::HttpConferenceProvider;
#[cfg(feature = "mock")]
pub use providers::mock::MockConferenceProvider;

/// Build the provider described by the `[conference]` section.
pub fn build_provider(config: &ConferenceConfig) -> AppResult<Arc<dyn ConferenceProvider>> {
    Ok(Arc::new(HttpConferenceProvider::new(config)?))
}
