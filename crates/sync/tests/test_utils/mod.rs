#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use doctor_sync_core::models::{Doctor, NewSlot, Slot};
use doctor_sync_db::SyncStore;
use doctor_sync_engine::{DirectoryClient, RetryPolicy};
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::{Context, SubscriberExt};
use uuid::Uuid;
use wiremock::MockServer;

pub const DIRECTORY_PATH: &str = "/api/doctors";
pub const USERNAME: &str = "doctors";
pub const PASSWORD: &str = "s3cret";

/// 2024-10-07 is a Monday.
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 7, 12, 0, 0).unwrap()
}

/// 2024-10-06 is a Sunday.
pub fn sunday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 6, 12, 0, 0).unwrap()
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(1),
    }
}

pub fn slots_path(doctor_id: i64) -> String {
    format!("{}/{}/slots", DIRECTORY_PATH, doctor_id)
}

pub fn client_for(server: &MockServer) -> DirectoryClient {
    DirectoryClient::with_credentials(
        &format!("{}{}", server.uri(), DIRECTORY_PATH),
        USERNAME,
        PASSWORD,
        fast_retry(),
        Duration::from_secs(5),
    )
    .expect("Failed to build client")
}

#[derive(Default)]
struct MemoryState {
    doctors: BTreeMap<i64, Doctor>,
    doctor_writes: Vec<Doctor>,
    slots: Vec<Slot>,
    slot_writes: usize,
    failing_slot_writes: Option<i64>,
}

/// In-memory store recording every write it receives.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot writes for `doctor_id` fail from now on.
    pub fn fail_slot_writes_for(&self, doctor_id: i64) {
        self.state.lock().unwrap().failing_slot_writes = Some(doctor_id);
    }

    pub fn insert_doctor(&self, doctor: Doctor) {
        self.state.lock().unwrap().doctors.insert(doctor.id, doctor);
    }

    pub fn insert_slot(&self, slot: Slot) {
        self.state.lock().unwrap().slots.push(slot);
    }

    pub fn doctor(&self, id: i64) -> Option<Doctor> {
        self.state.lock().unwrap().doctors.get(&id).cloned()
    }

    pub fn doctor_writes(&self) -> Vec<Doctor> {
        self.state.lock().unwrap().doctor_writes.clone()
    }

    pub fn slots_of(&self, doctor_id: i64) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .state
            .lock()
            .unwrap()
            .slots
            .iter()
            .filter(|s| s.doctor_id == doctor_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start);
        slots
    }

    pub fn slot_count(&self) -> usize {
        self.state.lock().unwrap().slots.len()
    }

    pub fn slot_writes(&self) -> usize {
        self.state.lock().unwrap().slot_writes
    }

    fn check_slot_write(state: &MemoryState, doctor_id: i64) -> eyre::Result<()> {
        if state.failing_slot_writes == Some(doctor_id) {
            return Err(eyre::eyre!("slot table is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn find_doctor(&self, id: i64) -> eyre::Result<Option<Doctor>> {
        Ok(self.doctor(id))
    }

    async fn save_doctor(&self, doctor: &Doctor) -> eyre::Result<Doctor> {
        let mut state = self.state.lock().unwrap();
        state.doctors.insert(doctor.id, doctor.clone());
        state.doctor_writes.push(doctor.clone());
        Ok(doctor.clone())
    }

    async fn find_slot(&self, doctor_id: i64, start: DateTime<Utc>) -> eyre::Result<Option<Slot>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .slots
            .iter()
            .find(|s| s.doctor_id == doctor_id && s.start == start)
            .cloned())
    }

    async fn create_slot(&self, new_slot: &NewSlot) -> eyre::Result<Slot> {
        let mut state = self.state.lock().unwrap();
        Self::check_slot_write(&state, new_slot.doctor_id)?;

        let slot = Slot {
            id: Uuid::new_v4(),
            doctor_id: new_slot.doctor_id,
            start: new_slot.start,
            end: new_slot.end,
            created_at: new_slot.created_at,
        };
        state.slots.push(slot.clone());
        state.slot_writes += 1;
        Ok(slot)
    }

    async fn update_slot(&self, slot: &Slot) -> eyre::Result<Slot> {
        let mut state = self.state.lock().unwrap();
        Self::check_slot_write(&state, slot.doctor_id)?;

        let stored = state
            .slots
            .iter_mut()
            .find(|s| s.id == slot.id)
            .ok_or_else(|| eyre::eyre!("Slot not found: {}", slot.id))?;
        stored.end = slot.end;
        let updated = stored.clone();
        state.slot_writes += 1;
        Ok(updated)
    }

    async fn slots_for_doctor(&self, doctor_id: i64) -> eyre::Result<Vec<Slot>> {
        Ok(self.slots_of(doctor_id))
    }
}

/// One captured log event.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: HashMap<String, String>,
}

/// Tracing layer that keeps every event emitted by this workspace.
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .collect()
    }

    pub fn count(&self, level: Level, message: &str) -> usize {
        self.records()
            .iter()
            .filter(|r| r.level == level && r.message == message)
            .count()
    }
}

struct RecordVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut HashMap<String, String>,
}

impl Visit for RecordVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for LogCapture
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with("doctor_sync") {
            return;
        }

        let mut message = String::new();
        let mut fields = HashMap::new();
        event.record(&mut RecordVisitor {
            message: &mut message,
            fields: &mut fields,
        });

        self.records.lock().unwrap().push(LogRecord {
            level: *event.metadata().level(),
            target: target.to_string(),
            message,
            fields,
        });
    }
}

/// Captures logs on the current thread until the guard is dropped.
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
