//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use livehub_auth::jwt::JwtDecoder;
use livehub_core::config::AppConfig;
use livehub_core::traits::ConferenceProvider;
use livehub_database::{SessionEventBus, Stores};
use livehub_service::{
    ActionService, AttendanceService, ChatService, EntitlementService, MeetingTokenService,
    RoomLifecycle, SessionContentService, StatusPolicy,
};

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    pub stores: Stores,
    pub events: SessionEventBus,
    pub provider: Arc<dyn ConferenceProvider>,
    pub rate_limiter: RateLimiter,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub session_service: SessionContentService,
    pub room_lifecycle: RoomLifecycle,
    pub token_service: MeetingTokenService,
    pub action_service: ActionService,
    pub chat_service: ChatService,
    pub attendance_service: AttendanceService,
    pub entitlement_service: EntitlementService,
}

impl AppState {
    /// Wire every service over the given stores and provider.
    pub fn new(config: AppConfig, stores: Stores, provider: Arc<dyn ConferenceProvider>) -> Self {
        let events = SessionEventBus::new(config.worker.event_buffer_size);
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let rate_limiter = RateLimiter::from_config(&config.rate_limit);

        let session_service = SessionContentService::new(
            Arc::clone(&stores.sessions),
            events.clone(),
            StatusPolicy::from(&config.live),
        );
        let room_lifecycle = RoomLifecycle::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&provider),
            config.conference.clone(),
        );
        let token_service = MeetingTokenService::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&provider),
            config.conference.clone(),
        );
        let action_service = ActionService::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&stores.actions),
            Arc::clone(&provider),
        );
        let chat_service = ChatService::new(Arc::clone(&stores.sessions), Arc::clone(&stores.chat));
        let attendance_service = AttendanceService::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&stores.attendance),
        );
        let entitlement_service = EntitlementService::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&stores.entitlements),
        );

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            stores,
            events,
            provider,
            rate_limiter,
            jwt_decoder,
            session_service,
            room_lifecycle,
            token_service,
            action_service,
            chat_service,
            attendance_service,
            entitlement_service,
        }
    }
}
