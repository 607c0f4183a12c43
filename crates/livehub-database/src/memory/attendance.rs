//! In-memory attendance log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::attendance::AttendanceRecord;

use crate::store::AttendanceStore;

#[derive(Debug, Default)]
pub struct MemoryAttendanceStore {
    records: DashMap<Uuid, AttendanceRecord>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn insert(&self, record: &AttendanceRecord) -> AppResult<AttendanceRecord> {
        self.records.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>> {
        Ok(self.records.get(&id).map(|r| r.clone()))
    }

    async fn close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<AttendanceRecord>> {
        Ok(self.records.get_mut(&id).map(|mut r| {
            if r.left_at.is_none() {
                r.left_at = Some(at);
            }
            r.clone()
        }))
    }

    async fn close_stale(&self, cutoff: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<u64> {
        let mut closed = 0;
        for mut record in self.records.iter_mut() {
            if record.left_at.is_none() && record.joined_at < cutoff {
                record.left_at = Some(at);
                record.auto_closed = true;
                closed += 1;
            }
        }
        Ok(closed)
    }
}
