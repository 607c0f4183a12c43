//! Store bundle selected by configuration.

use std::sync::Arc;

use tracing::info;

use livehub_core::config::{DatabaseBackend, DatabaseConfig};
use livehub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{
    MemoryActionStore, MemoryAttendanceStore, MemoryChatStore, MemoryEntitlementStore,
    MemorySessionStore,
};
use crate::repositories::{
    ActionRepository, AttendanceRepository, ChatRepository, EntitlementRepository,
    SessionRepository,
};
use crate::store::{ActionStore, AttendanceStore, ChatStore, EntitlementStore, SessionStore};

/// Every store the services need, behind trait objects.
///
/// The backend is chosen once at startup from `database.backend`.
#[derive(Debug, Clone)]
pub struct Stores {
    pub sessions: Arc<dyn SessionStore>,
    pub actions: Arc<dyn ActionStore>,
    pub chat: Arc<dyn ChatStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub entitlements: Arc<dyn EntitlementStore>,
    /// Present only for the PostgreSQL backend.
    pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured backend.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(pool))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory stores; data is not persisted");
                Ok(Self::memory())
            }
        }
    }

    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            sessions: Arc::new(SessionRepository::new(pg.clone())),
            actions: Arc::new(ActionRepository::new(pg.clone())),
            chat: Arc::new(ChatRepository::new(pg.clone())),
            attendance: Arc::new(AttendanceRepository::new(pg.clone())),
            entitlements: Arc::new(EntitlementRepository::new(pg)),
            pool: Some(pool),
        }
    }

    pub fn memory() -> Self {
        Self {
            sessions: Arc::new(MemorySessionStore::new()),
            actions: Arc::new(MemoryActionStore::new()),
            chat: Arc::new(MemoryChatStore::new()),
            attendance: Arc::new(MemoryAttendanceStore::new()),
            entitlements: Arc::new(MemoryEntitlementStore::new()),
            pool: None,
        }
    }

    /// Database connectivity; always healthy for the memory backend.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
