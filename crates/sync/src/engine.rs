//! Reconciliation of the remote directory against the local store.
//!
//! A run walks the directory in order, one doctor at a time:
//!
//! 1. upsert the doctor with its normalized name and a cleared error flag;
//! 2. fetch and decode its slots;
//! 3. create, refresh or skip each slot according to [`SlotDecision`].
//!
//! A failed slot fetch only flags that doctor; the run moves on. A failed
//! directory fetch aborts the run before anything is written.

use doctor_sync_core::{
    alerts::AlertPolicy,
    clock::Clock,
    errors::{FetchError, SyncResult},
    freshness::{FreshnessPolicy, SlotDecision},
    models::{DirectoryEntry, Doctor, SlotEntry},
    normalize::normalize_name,
};
use doctor_sync_db::SyncStore;
use tracing::{error, info};

use crate::client::DirectoryClient;
use crate::decode::{decode_directory, decode_slots};

/// Where a doctor ended up after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorState {
    SlotsSynced,
    SlotFetchFailed,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// False when the directory could not be fetched or decoded.
    pub completed: bool,
    pub doctors_created: usize,
    pub doctors_updated: usize,
    pub doctors_failed: usize,
    pub doctors_aborted: usize,
    pub slots_created: usize,
    pub slots_refreshed: usize,
    pub slots_unchanged: usize,
}

impl SyncReport {
    pub fn doctors_seen(&self) -> usize {
        self.doctors_created + self.doctors_updated
    }
}

pub struct Synchronizer<S, C, A> {
    client: DirectoryClient,
    store: S,
    clock: C,
    alerts: A,
    freshness: FreshnessPolicy,
}

impl<S, C, A> Synchronizer<S, C, A>
where
    S: SyncStore,
    C: Clock,
    A: AlertPolicy,
{
    pub fn new(client: DirectoryClient, store: S, clock: C, alerts: A) -> Self {
        Self {
            client,
            store,
            clock,
            alerts,
            freshness: FreshnessPolicy::default(),
        }
    }

    pub fn with_freshness(mut self, freshness: FreshnessPolicy) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one full synchronization.
    ///
    /// Outcomes are visible through the store and the logs; the returned
    /// report only summarizes them.
    pub async fn run(&self) -> SyncReport {
        let mut report = SyncReport::default();

        let directory = match self.fetch_directory().await {
            Ok(directory) => {
                info!(doctors = directory.len(), "Doctor list ok");
                directory
            }
            Err(err) => {
                error!(error = %err, "Error obtaining doctor list");
                return report;
            }
        };

        for entry in &directory {
            match self.sync_doctor(entry, &mut report).await {
                Ok(DoctorState::SlotsSynced) => {}
                Ok(DoctorState::SlotFetchFailed) => report.doctors_failed += 1,
                Err(err) => {
                    error!(doctor_id = entry.id, error = %err, "Doctor sync aborted");
                    report.doctors_aborted += 1;
                }
            }
        }

        report.completed = true;
        info!(
            doctors_created = report.doctors_created,
            doctors_updated = report.doctors_updated,
            doctors_failed = report.doctors_failed,
            doctors_aborted = report.doctors_aborted,
            slots_created = report.slots_created,
            slots_refreshed = report.slots_refreshed,
            slots_unchanged = report.slots_unchanged,
            "Doctor slot sync finished"
        );

        report
    }

    pub async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>, FetchError> {
        let body = self.client.fetch_directory().await?;
        Ok(decode_directory(&body)?)
    }

    pub async fn fetch_slots(&self, doctor_id: i64) -> Result<Vec<SlotEntry>, FetchError> {
        let body = self.client.fetch_slots(doctor_id).await?;
        let slots = decode_slots(&body)?;
        info!(doctor_id, slots = slots.len(), "Slots obtained for the doctor");
        Ok(slots)
    }

    /// Upserts one doctor and reconciles its slots.
    ///
    /// Only persistence failures come back as `Err`; fetch failures are
    /// recorded on the doctor and reported as [`DoctorState::SlotFetchFailed`].
    pub async fn sync_doctor(
        &self,
        entry: &DirectoryEntry,
        report: &mut SyncReport,
    ) -> SyncResult<DoctorState> {
        let name = normalize_name(&entry.name);
        info!(doctor_id = entry.id, name = %name, "Processing doctor");

        let mut doctor = match self.store.find_doctor(entry.id).await? {
            Some(mut doctor) => {
                doctor.rename(name);
                info!(doctor_id = entry.id, "Doctor updated");
                report.doctors_updated += 1;
                doctor
            }
            None => {
                info!(doctor_id = entry.id, "Doctor created");
                report.doctors_created += 1;
                Doctor::new(entry.id, name)
            }
        };

        doctor.clear_error();
        self.store.save_doctor(&doctor).await?;

        let slots = match self.fetch_slots(doctor.id).await {
            Ok(slots) => slots,
            Err(err) => {
                doctor.mark_error();
                self.store.save_doctor(&doctor).await?;

                if self.alerts.should_report_errors(self.clock.now()) {
                    error!(doctor_id = doctor.id, error = %err, "Error getting slots for doctor");
                }
                return Ok(DoctorState::SlotFetchFailed);
            }
        };

        for observed in &slots {
            info!(
                doctor_id = doctor.id,
                start = %observed.start.to_rfc3339(),
                end = %observed.end.to_rfc3339(),
                "Processing slot"
            );

            let existing = self.store.find_slot(doctor.id, observed.start).await?;
            let decision = SlotDecision::decide(
                existing,
                observed,
                doctor.id,
                self.clock.now(),
                &self.freshness,
            );

            match decision {
                SlotDecision::Create(new_slot) => {
                    self.store.create_slot(&new_slot).await?;
                    info!(doctor_id = doctor.id, "Slot created");
                    report.slots_created += 1;
                }
                SlotDecision::Refresh(slot) => {
                    self.store.update_slot(&slot).await?;
                    info!(doctor_id = doctor.id, slot_id = %slot.id, "Slot refreshed because it is stale");
                    report.slots_refreshed += 1;
                }
                SlotDecision::Unchanged(_) => report.slots_unchanged += 1,
            }
        }

        Ok(DoctorState::SlotsSynced)
    }
}
