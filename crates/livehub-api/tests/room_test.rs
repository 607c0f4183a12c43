//! Room lifecycle and meeting-token integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{TestApp, session_body};
use livehub_core::types::conference::RoomPrivacy;
use serde_json::json;

#[tokio::test]
async fn test_publishing_provisions_exactly_one_room() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("virtual", true)).await;
    let id = session["id"].as_str().unwrap().to_string();

    let linked = app
        .wait_for_session(&id, |s| {
            s["room_name"]
                .as_str()
                .is_some_and(|name| !name.starts_with("claim:"))
        })
        .await;
    assert!(linked["room_url"].as_str().unwrap().contains("mock"));

    // Re-publishing an already linked session must not create another room
    let response = app
        .request(
            "PUT",
            &format!("/api/sessions/{id}"),
            Some(json!({ "title": "Renamed", "published": true })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(app.provider.create_count(), 1);
    assert_eq!(app.provider.created_rooms()[0].privacy, RoomPrivacy::Private);
}

#[tokio::test]
async fn test_switching_to_in_person_tears_the_room_down() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("hybrid", true)).await;
    let id = session["id"].as_str().unwrap().to_string();

    let linked = app
        .wait_for_session(&id, |s| s["room_url"].is_string())
        .await;
    let room = linked["room_name"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/sessions/{id}"),
            Some(json!({ "format": "in_person" })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    app.wait_for_session(&id, |s| s["room_name"].is_null() && s["room_url"].is_null())
        .await;
    assert_eq!(app.provider.deleted_rooms(), vec![room]);
}

#[tokio::test]
async fn test_draft_session_is_never_provisioned() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("virtual", false)).await;
    let id = session["id"].as_str().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.provider.create_count(), 0);

    let response = app
        .request(
            "POST",
            "/api/live/token",
            Some(json!({ "session_id": id })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_meeting_token_ownership() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("virtual", true)).await;
    let id = session["id"].as_str().unwrap().to_string();
    app.wait_for_session(&id, |s| s["room_url"].is_string()).await;

    let speaker = app.token("Speaker@Example.com", "attendee");
    let response = app
        .request(
            "POST",
            "/api/live/token",
            Some(json!({ "session_id": id })),
            Some(&speaker),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_owner"], true);
    assert!(response.data()["token"].is_string());

    let attendee = app.token("guest@example.com", "attendee");
    let response = app
        .request(
            "POST",
            "/api/live/token",
            Some(json!({ "session_id": id, "user_name": "Guest" })),
            Some(&attendee),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_owner"], false);

    let response = app
        .request(
            "POST",
            "/api/live/token",
            Some(json!({ "session_id": id })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_owner"], false);

    let requests = app.provider.token_requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].properties.user_name.as_deref(), Some("Guest"));
}

#[tokio::test]
async fn test_meeting_token_rate_limit_returns_retry_after() {
    let mut config = helpers::test_config();
    config.rate_limit.meeting_token.max_requests = 2;
    let app = TestApp::with_config(config).await;
    let session = app.create_session(session_body("virtual", true)).await;
    let id = session["id"].as_str().unwrap().to_string();
    app.wait_for_session(&id, |s| s["room_url"].is_string()).await;

    let body = json!({ "session_id": id });
    for _ in 0..2 {
        let response = app
            .request_from("POST", "/api/live/token", Some(body.clone()), None, Some("10.0.0.1"))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let limited = app
        .request_from("POST", "/api/live/token", Some(body.clone()), None, Some("10.0.0.1"))
        .await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["error"], "RATE_LIMITED");
    assert_eq!(limited.headers["retry-after"], "60");

    // Other clients keep their own budget
    let other = app
        .request_from("POST", "/api/live/token", Some(body), None, Some("10.0.0.2"))
        .await;
    assert_eq!(other.status, StatusCode::OK);
}

#[tokio::test]
async fn test_explicit_room_control_requires_elevated_role() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("virtual", false)).await;
    let id = session["id"].as_str().unwrap();

    let response = app
        .request("POST", "/api/live/rooms", Some(json!({ "session_id": id })), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let attendee = app.token("guest@example.com", "attendee");
    let response = app
        .request(
            "POST",
            "/api/live/rooms",
            Some(json!({ "session_id": id })),
            Some(&attendee),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let moderator = app.token("mod@example.com", "moderator");
    let response = app
        .request(
            "POST",
            "/api/live/rooms",
            Some(json!({ "session_id": id })),
            Some(&moderator),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["created"], true);
    let room = response.data()["room_name"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/live/rooms",
            Some(json!({ "session_id": id })),
            Some(&moderator),
        )
        .await;
    assert_eq!(response.data()["created"], false);
    assert_eq!(response.data()["room_name"], room.as_str());

    let response = app
        .request(
            "DELETE",
            &format!("/api/live/rooms/{room}"),
            None,
            Some(&moderator),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["sessions_cleared"], 1);
}

#[tokio::test]
async fn test_room_for_in_person_session_is_rejected() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("in_person", true)).await;

    let response = app
        .request(
            "POST",
            "/api/live/rooms",
            Some(json!({ "session_id": session["id"] })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_failure_surfaces_as_bad_gateway() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("virtual", false)).await;
    app.provider.fail_next_create("room quota exceeded");

    let response = app
        .request(
            "POST",
            "/api/live/rooms",
            Some(json!({ "session_id": session["id"] })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "UPSTREAM_ERROR");
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("room quota exceeded")
    );

    // The claim was released, so a retry succeeds
    let response = app
        .request(
            "POST",
            "/api/live/rooms",
            Some(json!({ "session_id": session["id"] })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_room_properties_forwards_to_provider() {
    let app = TestApp::new().await;
    let session = app.create_session(session_body("virtual", true)).await;
    let id = session["id"].as_str().unwrap().to_string();
    let linked = app.wait_for_session(&id, |s| s["room_url"].is_string()).await;
    let room = linked["room_name"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/live/rooms/{room}/properties"),
            Some(json!({ "properties": { "enable_chat": false, "lang": "de" } })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.data()["name"], room.as_str());

    let updated = app.provider.updated_rooms();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].1.enable_chat, Some(false));
    assert_eq!(updated[0].1.extra["lang"], "de");

    let response = app
        .request(
            "POST",
            "/api/live/rooms/unknown-room/properties",
            Some(json!({ "properties": { "enable_chat": true } })),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}
