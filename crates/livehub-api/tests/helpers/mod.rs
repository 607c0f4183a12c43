//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tokio::sync::watch;
use tower::ServiceExt;
use uuid::Uuid;

use livehub_api::{AppState, build_app};
use livehub_conference::MockConferenceProvider;
use livehub_core::config::AppConfig;
use livehub_database::Stores;
use livehub_worker::RoomEventRunner;

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub provider: Arc<MockConferenceProvider>,
    pub config: AppConfig,
    shutdown: watch::Sender<bool>,
}

/// Parsed response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// App over memory stores and the mock provider, with the room
    /// reconciler running.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let provider = Arc::new(MockConferenceProvider::new());
        let state = AppState::new(config.clone(), Stores::memory(), provider.clone());

        let (shutdown, cancel) = watch::channel(false);
        let runner = RoomEventRunner::new(state.room_lifecycle.clone(), state.events.subscribe());
        tokio::spawn(runner.run(cancel));

        Self {
            router: build_app(state.clone()),
            state,
            provider,
            config,
            shutdown,
        }
    }

    /// Issue a request and parse the JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_from(method, uri, body, token, None).await
    }

    pub async fn request_from(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        forwarded_for: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        if let Some(ip) = forwarded_for {
            builder = builder.header("x-forwarded-for", ip);
        }
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let request = builder.body(body).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Signed token for a user with `role`.
    pub fn token(&self, email: &str, role: &str) -> String {
        self.token_for(Uuid::new_v4(), email, role)
    }

    pub fn token_for(&self, user_id: Uuid, email: &str, role: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = json!({
            "sub": user_id,
            "email": email,
            "name": email.split('@').next().unwrap_or(email),
            "role": role,
            "iat": now,
            "exp": now + 3600,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token("admin@example.com", "admin")
    }

    /// Create a session through the API and return its JSON.
    pub async fn create_session(&self, body: Value) -> Value {
        let response = self
            .request("POST", "/api/sessions", Some(body), Some(&self.admin_token()))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.data().clone()
    }

    /// Poll the session until `check` holds.
    pub async fn wait_for_session(&self, id: &str, check: impl Fn(&Value) -> bool) -> Value {
        for _ in 0..100 {
            let response = self
                .request("GET", &format!("/api/sessions/{id}"), None, None)
                .await;
            if check(response.data()) {
                return response.data().clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session {id} never reached the expected state");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config
}

/// A session body starting now and lasting an hour.
pub fn session_body(format: &str, published: bool) -> Value {
    let now = chrono::Utc::now();
    json!({
        "event_id": Uuid::new_v4(),
        "title": "Integration session",
        "format": format,
        "stream_mode": "call",
        "start_date": now,
        "end_date": now + chrono::Duration::hours(1),
        "published": published,
        "speaker_emails": ["speaker@example.com"],
    })
}
