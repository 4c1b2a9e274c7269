use async_trait::async_trait;
use chrono::{DateTime, Utc};
use doctor_sync_core::models::{Doctor, NewSlot, Slot};
use mockall::mock;

use crate::store::SyncStore;

// Mock store for testing
mock! {
    pub SyncStore {}

    #[async_trait]
    impl SyncStore for SyncStore {
        async fn find_doctor(&self, id: i64) -> eyre::Result<Option<Doctor>>;

        async fn save_doctor(&self, doctor: &Doctor) -> eyre::Result<Doctor>;

        async fn find_slot(
            &self,
            doctor_id: i64,
            start: DateTime<Utc>,
        ) -> eyre::Result<Option<Slot>>;

        async fn create_slot(&self, slot: &NewSlot) -> eyre::Result<Slot>;

        async fn update_slot(&self, slot: &Slot) -> eyre::Result<Slot>;

        async fn slots_for_doctor(&self, doctor_id: i64) -> eyre::Result<Vec<Slot>>;
    }
}
