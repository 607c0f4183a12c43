//! In-process bus for session change events.

use tokio::sync::broadcast;
use tracing::debug;

use livehub_entity::session::SessionChanged;

/// Broadcast channel carrying [`SessionChanged`] events from the content
/// write path to background consumers.
#[derive(Debug, Clone)]
pub struct SessionEventBus {
    tx: broadcast::Sender<SessionChanged>,
}

impl SessionEventBus {
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn publish(&self, event: SessionChanged) -> usize {
        let session_id = event.current.id;
        match self.tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                debug!(session_id = %session_id, "No session event subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionChanged> {
        self.tx.subscribe()
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
