//! Room reconciler: consumes session change events and drives the room
//! lifecycle.

use tokio::sync::{broadcast, watch};

use livehub_entity::session::SessionChanged;
use livehub_service::RoomLifecycle;

/// Applies room side effects for every committed session write.
///
/// Events are handled one at a time so that consecutive changes to the
/// same session are applied in order. A failed event is logged and
/// dropped; the next qualifying change retries.
#[derive(Debug)]
pub struct RoomEventRunner {
    lifecycle: RoomLifecycle,
    events: broadcast::Receiver<SessionChanged>,
}

impl RoomEventRunner {
    pub fn new(lifecycle: RoomLifecycle, events: broadcast::Receiver<SessionChanged>) -> Self {
        Self { lifecycle, events }
    }

    /// Run until the cancel signal is received or the bus closes.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        tracing::info!("Room reconciler started");

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Room reconciler received shutdown signal");
                        break;
                    }
                }
                received = self.events.recv() => match received {
                    Ok(event) => self.handle(&event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            skipped,
                            "Room reconciler lagged; skipped session events are not replayed"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Session event bus closed");
                        break;
                    }
                },
            }
        }

        tracing::info!("Room reconciler shut down complete");
    }

    async fn handle(&self, event: &SessionChanged) {
        if let Err(e) = self.lifecycle.on_session_changed(event).await {
            tracing::error!(
                session_id = %event.current.id,
                error = %e,
                "Room lifecycle update failed"
            );
        }
    }
}
