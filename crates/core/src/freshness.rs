//! Refresh policy for slots that already exist locally.
//!
//! Staleness is measured from the slot's own `created_at`, not from when the
//! remote last reported it. Once a slot is older than the threshold, every
//! sync is allowed to overwrite its end time.

use chrono::{DateTime, Utc};

use crate::models::{NewSlot, Slot, SlotEntry};

pub const DEFAULT_STALE_AFTER_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub stale_after_secs: i64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
        }
    }
}

impl FreshnessPolicy {
    pub fn new(stale_after_secs: i64) -> Self {
        Self { stale_after_secs }
    }

    /// True once more than `stale_after_secs` whole seconds have passed
    /// since the slot was created.
    pub fn should_refresh(&self, slot: &Slot, now: DateTime<Utc>) -> bool {
        let elapsed = now.timestamp() - slot.created_at.timestamp();
        elapsed > self.stale_after_secs
    }
}

/// What to do with one observed remote slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotDecision {
    /// Nothing matches `(doctor, start)` yet.
    Create(NewSlot),
    /// A stale match whose end has been overwritten with the observed one.
    Refresh(Slot),
    /// A fresh match; no write is needed.
    Unchanged(Slot),
}

impl SlotDecision {
    pub fn decide(
        existing: Option<Slot>,
        observed: &SlotEntry,
        doctor_id: i64,
        now: DateTime<Utc>,
        policy: &FreshnessPolicy,
    ) -> Self {
        match existing {
            None => SlotDecision::Create(NewSlot {
                doctor_id,
                start: observed.start,
                end: observed.end,
                created_at: now,
            }),
            Some(mut slot) if policy.should_refresh(&slot, now) => {
                slot.set_end(observed.end);
                SlotDecision::Refresh(slot)
            }
            Some(slot) => SlotDecision::Unchanged(slot),
        }
    }
}
