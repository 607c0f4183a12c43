//! Application builder: wires router, middleware, state and background
//! tasks into a running server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use livehub_core::config::AppConfig;
use livehub_core::error::AppError;
use livehub_core::traits::ConferenceProvider;
use livehub_database::Stores;
use livehub_worker::jobs::AttendanceAutoClose;
use livehub_worker::{CronScheduler, RoomEventRunner};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Background tasks started next to the HTTP server.
#[derive(Debug)]
struct BackgroundTasks {
    reconciler: Option<JoinHandle<()>>,
    sweeper: JoinHandle<()>,
    scheduler: Option<CronScheduler>,
}

/// Start the room reconciler, the attendance cron job and the rate
/// limiter sweep. Everything stops when `shutdown` flips to true.
async fn start_background(
    state: &AppState,
    shutdown: &watch::Receiver<bool>,
) -> Result<BackgroundTasks, AppError> {
    let config = &state.config;

    let sweeper = state.rate_limiter.spawn_sweeper(
        Duration::from_secs(config.rate_limit.sweep_interval_seconds.max(1)),
        shutdown.clone(),
    );

    if !config.worker.enabled {
        tracing::warn!("Worker disabled: rooms will not follow session changes");
        return Ok(BackgroundTasks {
            reconciler: None,
            sweeper,
            scheduler: None,
        });
    }

    let runner = RoomEventRunner::new(state.room_lifecycle.clone(), state.events.subscribe());
    let reconciler = tokio::spawn(runner.run(shutdown.clone()));

    let scheduler = CronScheduler::new().await?;
    scheduler
        .register_attendance_auto_close(
            &config.attendance.auto_close_cron,
            AttendanceAutoClose::new(state.attendance_service.clone(), &config.attendance),
        )
        .await?;
    scheduler.start().await?;

    Ok(BackgroundTasks {
        reconciler: Some(reconciler),
        sweeper,
        scheduler: Some(scheduler),
    })
}

/// Runs the LiveHub server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LiveHub server...");

    // ── Step 1: Stores ───────────────────────────────────────────
    tracing::info!(backend = ?config.database.backend, "Initializing stores");
    let stores = Stores::from_config(&config.database).await?;

    // ── Step 2: Conferencing provider ────────────────────────────
    let provider: Arc<dyn ConferenceProvider> =
        livehub_conference::build_provider(&config.conference)?;
    tracing::info!(provider = provider.provider_type(), "Conferencing provider ready");

    // ── Step 3: State and background tasks ───────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, stores.clone(), provider);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut background = start_background(&state, &shutdown_rx).await?;

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("LiveHub server listening on {}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let served = server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    // ── Step 5: Drain ────────────────────────────────────────────
    tracing::info!("Shutting down background tasks");
    if let Some(reconciler) = background.reconciler.take() {
        if tokio::time::timeout(grace, reconciler).await.is_err() {
            tracing::warn!("Room reconciler did not stop within the grace period");
        }
    }
    if let Some(mut scheduler) = background.scheduler.take() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Cron scheduler shutdown failed");
        }
    }
    let _ = tokio::time::timeout(grace, background.sweeper).await;
    stores.close().await;

    tracing::info!("LiveHub server stopped");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
