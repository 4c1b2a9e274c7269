//! # Doctor Sync Engine
//!
//! Pulls the doctor directory and each doctor's slots from the remote
//! service and reconciles them against the local store.
//!
//! ## Architecture
//!
//! - **Client**: authenticated HTTP fetches with a flat retry policy
//! - **Decode**: strict JSON decoding of directory and slot payloads
//! - **Engine**: the per-doctor create/refresh/skip reconciliation
//! - **Config**: environment configuration for the binaries

/// Environment configuration
pub mod config;
/// Remote directory HTTP client
pub mod client;
/// Payload decoding
pub mod decode;
/// Reconciliation engine
pub mod engine;

pub use client::{DirectoryClient, RetryPolicy};
pub use config::SyncConfig;
pub use engine::{DoctorState, SyncReport, Synchronizer};
