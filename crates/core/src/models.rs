pub mod doctor;
pub mod payload;
pub mod slot;

pub use doctor::Doctor;
pub use payload::{DirectoryEntry, SlotEntry};
pub use slot::{NewSlot, Slot};
