//! Route definitions for the LiveHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use livehub_core::config::RouteLimit;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::rate_limit::RouteGuard;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(room_routes(&state))
        .merge(action_routes(&state))
        .merge(chat_routes(&state))
        .merge(attendance_routes())
        .merge(entitlement_routes())
        .merge(session_routes())
        .route("/health", get(handlers::health::health));

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

fn guard(state: &AppState, action: &'static str, limit: RouteLimit) -> RouteGuard {
    RouteGuard {
        limiter: state.rate_limiter.clone(),
        action,
        limit,
        enabled: state.config.rate_limit.enabled,
    }
}

/// Room lifecycle and meeting tokens
fn room_routes(state: &AppState) -> Router<AppState> {
    let token = Router::new()
        .route("/live/token", post(handlers::room::meeting_token))
        .route_layer(axum_middleware::from_fn_with_state(
            guard(state, "meeting-token", state.config.rate_limit.meeting_token),
            middleware::rate_limit::enforce,
        ));

    Router::new()
        .route("/live/rooms", post(handlers::room::create_room))
        .route("/live/rooms/{room_name}", delete(handlers::room::delete_room))
        .route(
            "/live/rooms/{room_name}/properties",
            post(handlers::room::update_room_properties),
        )
        .merge(token)
}

/// Live action broadcast and log
fn action_routes(state: &AppState) -> Router<AppState> {
    let send = Router::new()
        .route("/live/actions/send", post(handlers::live::send_action))
        .route_layer(axum_middleware::from_fn_with_state(
            guard(state, "send-action", state.config.rate_limit.send_action),
            middleware::rate_limit::enforce,
        ));

    Router::new()
        .route("/live/actions", post(handlers::live::save_action))
        .route(
            "/live/actions/{id}",
            get(handlers::live::list_actions).delete(handlers::live::remove_action),
        )
        .merge(send)
}

/// Chat log
fn chat_routes(state: &AppState) -> Router<AppState> {
    let save = Router::new()
        .route("/live/chat", post(handlers::chat::save_chat))
        .route_layer(axum_middleware::from_fn_with_state(
            guard(state, "chat", state.config.rate_limit.chat),
            middleware::rate_limit::enforce,
        ));

    Router::new()
        .route(
            "/live/chat/{id}",
            get(handlers::chat::list_chat).delete(handlers::chat::delete_chat),
        )
        .merge(save)
}

/// Attendance log
fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/live/attendance/join", post(handlers::attendance::join))
        .route("/live/attendance/leave", post(handlers::attendance::leave))
}

/// Access grants
fn entitlement_routes() -> Router<AppState> {
    Router::new()
        .route("/entitlements", post(handlers::entitlement::grant))
        .route("/entitlements/check", post(handlers::entitlement::check))
}

/// Session content and status
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).put(handlers::session::update_session),
        )
        .route("/sessions/{id}/status", get(handlers::session::session_status))
}
