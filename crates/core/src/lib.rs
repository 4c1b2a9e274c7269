//! # Doctor Sync Core
//!
//! Domain types and pure policies shared by the persistence layer and the
//! synchronization engine. Nothing in this crate performs I/O.

pub mod alerts;
pub mod clock;
pub mod errors;
pub mod freshness;
pub mod models;
pub mod normalize;
