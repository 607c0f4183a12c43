//! In-memory entitlement store.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::entitlement::Entitlement;

use crate::store::EntitlementStore;

/// Grants in insertion order. The scope check and insert happen under one
/// lock, so duplicate tuples can never both be stored.
#[derive(Debug, Default)]
pub struct MemoryEntitlementStore {
    grants: Mutex<Vec<Entitlement>>,
}

impl MemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntitlementStore for MemoryEntitlementStore {
    async fn find_for_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        event_id: Option<Uuid>,
    ) -> AppResult<Option<Entitlement>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .find(|g| {
                g.user_id == user_id
                    && g.session_id == Some(session_id)
                    && event_id.is_none_or(|e| g.event_id == e)
            })
            .cloned())
    }

    async fn find_event_wide(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> AppResult<Option<Entitlement>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .find(|g| g.same_scope(user_id, event_id, None))
            .cloned())
    }

    async fn insert_if_absent(&self, entitlement: &Entitlement) -> AppResult<(Entitlement, bool)> {
        let mut grants = self.grants.lock().await;
        if let Some(existing) = grants.iter().find(|g| {
            g.same_scope(
                entitlement.user_id,
                entitlement.event_id,
                entitlement.session_id,
            )
        }) {
            return Ok((existing.clone(), false));
        }
        grants.push(entitlement.clone());
        Ok((entitlement.clone(), true))
    }
}
