//! REST client for the hosted conferencing service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use livehub_core::config::ConferenceConfig;
use livehub_core::error::{AppError, ErrorKind};
use livehub_core::result::AppResult;
use livehub_core::traits::ConferenceProvider;
use livehub_core::types::conference::{
    MeetingToken, MeetingTokenRequest, ProviderRoom, RoomCreateRequest, RoomDeletion,
    RoomProperties,
};

/// Conferencing provider reached over HTTPS with a bearer API key.
///
/// Every call shares one `reqwest::Client` whose request and connect
/// timeouts come from configuration.
#[derive(Debug, Clone)]
pub struct HttpConferenceProvider {
    client: Client,
    base_url: Url,
    api_key: String,
}

#[derive(serde::Serialize)]
struct AppMessageBody<'a> {
    data: &'a serde_json::Value,
    recipient: &'a str,
}

#[derive(serde::Serialize)]
struct UpdateRoomBody<'a> {
    properties: &'a RoomProperties,
}

impl HttpConferenceProvider {
    pub fn new(config: &ConferenceConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build conferencing client: {e}"),
                    e,
                )
            })?;

        if config.api_key.is_empty() {
            warn!("Conferencing API key is empty; provider calls will be rejected");
        }

        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid conferencing base URL '{}': {e}", config.base_url),
                e,
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "Invalid conferencing base URL '{}'",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as a single
    /// path segment.
    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::configuration("Conferencing base URL cannot hold a path"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// URL of a room endpoint. Dot segments would be resolved away by the
    /// client, so they are refused outright.
    fn room_url(&self, room_name: &str, action: Option<&str>) -> AppResult<Url> {
        if room_name.is_empty() || room_name == "." || room_name == ".." {
            return Err(AppError::validation(format!("Invalid room name '{room_name}'")));
        }
        match action {
            Some(action) => self.url(&["rooms", room_name, action]),
            None => self.url(&["rooms", room_name]),
        }
    }

    async fn send(&self, op: &'static str, request: RequestBuilder) -> AppResult<reqwest::Response> {
        request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(op, e))
    }

    async fn parse<T: DeserializeOwned>(
        op: &'static str,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(provider_error(op, status, response).await);
        }
        response.json::<T>().await.map_err(|e| {
            error!(op, error = %e, "Unreadable conferencing response");
            AppError::external_service(format!("Invalid response from conferencing provider: {e}"))
        })
    }
}

#[async_trait]
impl ConferenceProvider for HttpConferenceProvider {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn create_room(&self, request: &RoomCreateRequest) -> AppResult<ProviderRoom> {
        let response = self
            .send("create_room", self.client.post(self.url(&["rooms"])?).json(request))
            .await?;
        let room: ProviderRoom = Self::parse("create_room", response).await?;
        info!(room = %room.name, "Conferencing room created");
        Ok(room)
    }

    async fn update_room(
        &self,
        room_name: &str,
        properties: &RoomProperties,
    ) -> AppResult<ProviderRoom> {
        let body = UpdateRoomBody { properties };
        let response = self
            .send(
                "update_room",
                self.client
                    .post(self.room_url(room_name, None)?)
                    .json(&body),
            )
            .await?;
        Self::parse("update_room", response).await
    }

    async fn delete_room(&self, room_name: &str) -> AppResult<RoomDeletion> {
        let response = self
            .send(
                "delete_room",
                self.client.delete(self.room_url(room_name, None)?),
            )
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(room = %room_name, "Room already gone at provider");
                Ok(RoomDeletion::AlreadyGone)
            }
            status if status.is_success() => {
                info!(room = %room_name, "Conferencing room deleted");
                Ok(RoomDeletion::Deleted)
            }
            status => Err(provider_error("delete_room", status, response).await),
        }
    }

    async fn create_meeting_token(
        &self,
        request: &MeetingTokenRequest,
    ) -> AppResult<MeetingToken> {
        let response = self
            .send(
                "create_meeting_token",
                self.client.post(self.url(&["meeting-tokens"])?).json(request),
            )
            .await?;
        Self::parse("create_meeting_token", response).await
    }

    async fn send_app_message(
        &self,
        room_name: &str,
        data: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        let body = AppMessageBody {
            data,
            recipient: "*",
        };
        let response = self
            .send(
                "send_app_message",
                self.client
                    .post(self.room_url(room_name, Some("send-app-message"))?)
                    .json(&body),
            )
            .await?;
        Self::parse("send_app_message", response).await
    }
}

fn transport_error(op: &'static str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        error!(op, "Conferencing provider timed out");
        return AppError::external_service("Conferencing provider request timed out");
    }
    error!(op, error = %err, "Conferencing provider unreachable");
    AppError::external_service(format!("Conferencing provider unreachable: {err}"))
}

/// Turn a non-2xx response into an error carrying the provider's own text.
async fn provider_error(
    op: &'static str,
    status: StatusCode,
    response: reqwest::Response,
) -> AppError {
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        format!("Conferencing provider returned {status}")
    });
    error!(op, status = status.as_u16(), message = %message, "Conferencing call failed");
    AppError::external_service(message)
}

/// `info`, else `error`, from a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["info", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{delete, post};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn provider(base_url: String, timeout_secs: u64) -> HttpConferenceProvider {
        HttpConferenceProvider::new(&ConferenceConfig {
            base_url,
            api_key: "test-key".into(),
            request_timeout_seconds: timeout_secs,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_error_message_prefers_info() {
        assert_eq!(
            error_message(r#"{"error":"invalid-request-error","info":"room exists"}"#),
            Some("room exists".to_string())
        );
        assert_eq!(
            error_message(r#"{"error":"authentication-error"}"#),
            Some("authentication-error".to_string())
        );
        assert_eq!(error_message("not json"), None);
    }

    #[tokio::test]
    async fn test_create_room_posts_properties() {
        let app = Router::new().route(
            "/rooms",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["properties"]["enable_knocking"], false);
                Json(json!({ "name": "abc", "url": "https://rooms.test/abc", "config": {} }))
            }),
        );
        let base = serve(app).await;

        let room = provider(base, 5)
            .create_room(&RoomCreateRequest {
                properties: RoomProperties {
                    enable_knocking: Some(false),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(room.name, "abc");
        assert_eq!(room.url, "https://rooms.test/abc");
    }

    #[tokio::test]
    async fn test_provider_error_text_is_verbatim() {
        let app = Router::new().route(
            "/rooms",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({ "error": "invalid-request-error", "info": "exp must be in the future" })),
                )
            }),
        );
        let base = serve(app).await;

        let err = provider(base, 5)
            .create_room(&RoomCreateRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(err.message, "exp must be in the future");
    }

    #[tokio::test]
    async fn test_delete_missing_room_is_already_gone() {
        let app = Router::new().route(
            "/rooms/{name}",
            delete(|| async { (AxumStatus::NOT_FOUND, Json(json!({ "error": "not-found" }))) }),
        );
        let base = serve(app).await;

        let outcome = provider(base, 5).delete_room("gone").await.unwrap();
        assert_eq!(outcome, RoomDeletion::AlreadyGone);
    }

    #[tokio::test]
    async fn test_room_name_stays_one_path_segment() {
        let app = Router::new()
            .route(
                "/rooms/{name}",
                delete(|Path(name): Path<String>| async move {
                    assert_eq!(name, "a/b");
                    Json(json!({ "deleted": true }))
                }),
            )
            .route(
                "/rooms/a/b",
                delete(|| async { (AxumStatus::IM_A_TEAPOT, Json(json!({ "info": "escaped" }))) }),
            );
        let base = serve(app).await;

        let outcome = provider(base, 5).delete_room("a/b").await.unwrap();
        assert_eq!(outcome, RoomDeletion::Deleted);
    }

    #[tokio::test]
    async fn test_dot_room_names_are_refused() {
        let provider = provider("http://127.0.0.1:9".into(), 5);
        for name in [".", "..", ""] {
            let err = provider.delete_room(name).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }

    #[test]
    fn test_base_path_is_kept() {
        let provider = provider("https://api.example.com/v1/".into(), 5);
        let url = provider.room_url("room one", Some("send-app-message")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/rooms/room%20one/send-app-message"
        );
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let app = Router::new().route(
            "/meeting-tokens",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "token": "late" }))
            }),
        );
        let base = serve(app).await;

        let err = provider(base, 1)
            .create_meeting_token(&MeetingTokenRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(err.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_app_message_targets_everyone() {
        let app = Router::new().route(
            "/rooms/{name}/send-app-message",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["recipient"], "*");
                assert_eq!(body["data"]["type"], "hand-raise");
                Json(json!({ "sent": true }))
            }),
        );
        let base = serve(app).await;

        let ack = provider(base, 5)
            .send_app_message("abc", &json!({ "type": "hand-raise" }))
            .await
            .unwrap();
        assert_eq!(ack, json!({ "sent": true }));
    }
}
