//! The persistence port consumed by the synchronization engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doctor_sync_core::models::{Doctor, NewSlot, Slot};
use eyre::Result;

use crate::DbPool;
use crate::repositories::{doctor, slot};

/// Record store for doctors and their slots.
///
/// Every call is its own unit of work; nothing is batched across calls.
#[async_trait]
pub trait SyncStore: Send + Sync {
    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>>;

    /// Creates the doctor or overwrites its name and error flag.
    async fn save_doctor(&self, doctor: &Doctor) -> Result<Doctor>;

    async fn find_slot(&self, doctor_id: i64, start: DateTime<Utc>) -> Result<Option<Slot>>;

    async fn create_slot(&self, slot: &NewSlot) -> Result<Slot>;

    /// Persists the slot's end time.
    async fn update_slot(&self, slot: &Slot) -> Result<Slot>;

    async fn slots_for_doctor(&self, doctor_id: i64) -> Result<Vec<Slot>>;
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgSyncStore {
    pool: DbPool,
}

impl PgSyncStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SyncStore for PgSyncStore {
    async fn find_doctor(&self, id: i64) -> Result<Option<Doctor>> {
        let row = doctor::get_doctor_by_id(&self.pool, id).await?;
        Ok(row.map(Doctor::from))
    }

    async fn save_doctor(&self, record: &Doctor) -> Result<Doctor> {
        let row = doctor::upsert_doctor(&self.pool, record.id, &record.name, record.has_error).await?;
        Ok(row.into())
    }

    async fn find_slot(&self, doctor_id: i64, start: DateTime<Utc>) -> Result<Option<Slot>> {
        let row = slot::get_slot_by_doctor_and_start(&self.pool, doctor_id, start).await?;
        Ok(row.map(Slot::from))
    }

    async fn create_slot(&self, new_slot: &NewSlot) -> Result<Slot> {
        let row = slot::create_slot(
            &self.pool,
            new_slot.doctor_id,
            new_slot.start,
            new_slot.end,
            new_slot.created_at,
        )
        .await?;
        Ok(row.into())
    }

    async fn update_slot(&self, record: &Slot) -> Result<Slot> {
        let row = slot::update_slot_end(&self.pool, record.id, record.end).await?;
        Ok(row.into())
    }

    async fn slots_for_doctor(&self, doctor_id: i64) -> Result<Vec<Slot>> {
        let rows = slot::get_slots_by_doctor_id(&self.pool, doctor_id).await?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }
}
