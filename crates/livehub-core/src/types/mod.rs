//! Core type definitions used across the LiveHub workspace.

pub mod conference;

pub use conference::{
    MeetingToken, MeetingTokenProperties, MeetingTokenRequest, ProviderRoom, RoomCreateRequest,
    RoomDeletion, RoomPrivacy, RoomProperties,
};
