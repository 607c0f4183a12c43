//! Recording conferencing provider for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use livehub_core::error::AppError;
use livehub_core::result::AppResult;
use livehub_core::traits::ConferenceProvider;
use livehub_core::types::conference::{
    MeetingToken, MeetingTokenRequest, ProviderRoom, RoomCreateRequest, RoomDeletion,
    RoomProperties,
};

/// In-process provider that keeps every request it receives.
///
/// Rooms are named `mock-room-<n>` unless the request names one. Failures
/// can be armed per operation to exercise error paths.
#[derive(Debug, Default)]
pub struct MockConferenceProvider {
    created: Mutex<Vec<RoomCreateRequest>>,
    updated: Mutex<Vec<(String, RoomProperties)>>,
    deleted: Mutex<Vec<String>>,
    tokens: Mutex<Vec<MeetingTokenRequest>>,
    messages: Mutex<Vec<(String, serde_json::Value)>>,
    live_rooms: Mutex<Vec<String>>,
    counter: AtomicUsize,
    create_failure: Mutex<Option<String>>,
    create_delay: Mutex<Option<Duration>>,
}

impl MockConferenceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_room` fail with `message`.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        *lock(&self.create_failure) = Some(message.into());
    }

    /// Hold every `create_room` call for `delay` before answering.
    pub fn set_create_delay(&self, delay: Duration) {
        *lock(&self.create_delay) = Some(delay);
    }

    pub fn created_rooms(&self) -> Vec<RoomCreateRequest> {
        lock(&self.created).clone()
    }

    pub fn create_count(&self) -> usize {
        lock(&self.created).len()
    }

    pub fn updated_rooms(&self) -> Vec<(String, RoomProperties)> {
        lock(&self.updated).clone()
    }

    pub fn deleted_rooms(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    pub fn token_requests(&self) -> Vec<MeetingTokenRequest> {
        lock(&self.tokens).clone()
    }

    pub fn sent_messages(&self) -> Vec<(String, serde_json::Value)> {
        lock(&self.messages).clone()
    }

    fn room(name: &str) -> ProviderRoom {
        ProviderRoom {
            name: name.to_string(),
            url: format!("https://mock.conference.test/{name}"),
            privacy: Some("private".to_string()),
            config: serde_json::Value::Null,
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ConferenceProvider for MockConferenceProvider {
    fn provider_type(&self) -> &str {
        "mock"
    }

    async fn create_room(&self, request: &RoomCreateRequest) -> AppResult<ProviderRoom> {
        let delay = *lock(&self.create_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.created).push(request.clone());

        if let Some(message) = lock(&self.create_failure).take() {
            return Err(AppError::external_service(message));
        }

        let name = request.name.clone().unwrap_or_else(|| {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("mock-room-{n}")
        });
        lock(&self.live_rooms).push(name.clone());
        debug!(room = %name, "Mock room created");
        Ok(Self::room(&name))
    }

    async fn update_room(
        &self,
        room_name: &str,
        properties: &RoomProperties,
    ) -> AppResult<ProviderRoom> {
        if !lock(&self.live_rooms).iter().any(|r| r == room_name) {
            return Err(AppError::external_service(format!(
                "room {room_name} was not found"
            )));
        }
        lock(&self.updated).push((room_name.to_string(), properties.clone()));
        let mut room = Self::room(room_name);
        room.config = serde_json::to_value(properties)?;
        Ok(room)
    }

    async fn delete_room(&self, room_name: &str) -> AppResult<RoomDeletion> {
        lock(&self.deleted).push(room_name.to_string());
        let mut live = lock(&self.live_rooms);
        let before = live.len();
        live.retain(|r| r != room_name);
        Ok(if live.len() < before {
            RoomDeletion::Deleted
        } else {
            RoomDeletion::AlreadyGone
        })
    }

    async fn create_meeting_token(
        &self,
        request: &MeetingTokenRequest,
    ) -> AppResult<MeetingToken> {
        lock(&self.tokens).push(request.clone());
        Ok(MeetingToken {
            token: format!(
                "mock-token-{}-{}",
                request.properties.room_name,
                uuid::Uuid::new_v4().simple()
            ),
        })
    }

    async fn send_app_message(
        &self,
        room_name: &str,
        data: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        lock(&self.messages).push((room_name.to_string(), data.clone()));
        Ok(serde_json::json!({ "sent": true }))
    }
}
