//! Conferencing provider trait for the third-party video room API.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::conference::{
    MeetingToken, MeetingTokenRequest, ProviderRoom, RoomCreateRequest, RoomDeletion,
    RoomProperties,
};

/// Trait for the hosted video-conferencing backend.
///
/// The [`ConferenceProvider`] trait is defined here in `livehub-core` and
/// implemented in `livehub-conference`. Every call is bounded by the
/// implementation's request timeout; a timeout surfaces as an
/// [`ExternalService`](crate::error::ErrorKind::ExternalService) error.
#[async_trait]
pub trait ConferenceProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "http", "mock").
    fn provider_type(&self) -> &str;

    /// Create a room with the given properties.
    async fn create_room(&self, request: &RoomCreateRequest) -> AppResult<ProviderRoom>;

    /// Replace properties on an existing room.
    async fn update_room(
        &self,
        room_name: &str,
        properties: &RoomProperties,
    ) -> AppResult<ProviderRoom>;

    /// Delete a room. A room the provider no longer knows is reported as
    /// [`RoomDeletion::AlreadyGone`] rather than an error.
    async fn delete_room(&self, room_name: &str) -> AppResult<RoomDeletion>;

    /// Mint a room-scoped meeting token.
    async fn create_meeting_token(&self, request: &MeetingTokenRequest)
    -> AppResult<MeetingToken>;

    /// Broadcast an application message to every participant in the room.
    ///
    /// Returns the provider's acknowledgement body.
    async fn send_app_message(
        &self,
        room_name: &str,
        data: &serde_json::Value,
    ) -> AppResult<serde_json::Value>;
}
