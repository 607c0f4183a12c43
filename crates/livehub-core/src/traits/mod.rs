//! Core traits defined in `livehub-core` and implemented by other crates.

pub mod conference;

pub use conference::ConferenceProvider;
