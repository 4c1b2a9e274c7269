use doctor_sync_core::{
    errors::DecodeError,
    models::{DirectoryEntry, SlotEntry},
};
use serde::de::DeserializeOwned;

/// Strictly parses a JSON array. One bad record fails the whole payload.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn decode_directory(bytes: &[u8]) -> Result<Vec<DirectoryEntry>, DecodeError> {
    decode(bytes)
}

pub fn decode_slots(bytes: &[u8]) -> Result<Vec<SlotEntry>, DecodeError> {
    decode(bytes)
}
