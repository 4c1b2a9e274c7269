use serde::{Deserialize, Serialize};

/// A doctor as known locally.
///
/// The id is assigned by the remote directory and never generated here.
/// Slots are not held on the doctor; they are queried from the store by
/// `doctor_id` when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    /// Set when the last slot fetch for this doctor failed.
    pub has_error: bool,
}

impl Doctor {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            has_error: false,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn mark_error(&mut self) {
        self.has_error = true;
    }

    pub fn clear_error(&mut self) {
        self.has_error = false;
    }
}
