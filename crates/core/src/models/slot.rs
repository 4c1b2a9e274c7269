use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted availability slot. `(doctor_id, start)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub doctor_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// First-seen time; never rewritten after insert.
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn set_end(&mut self, end: DateTime<Utc>) {
        self.end = end;
    }
}

/// A slot that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub doctor_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
