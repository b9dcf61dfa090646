//! Periodic synchronization for Quire.
//!
//! Wraps an [`Updater`](quire_update::Updater) in a supervised worker:
//!
//! - [`SyncWorker`] -- one tokio task per repository; cycles never overlap
//! - [`LiveCache`] -- the snapshot readers use, replaced atomically
//! - [`SyncConfig`] -- interval, repository reference and layout from TOML
//!
//! A failed cycle is logged and leaves the live snapshot untouched; the next
//! tick simply tries again.

pub mod cache;
pub mod config;
pub mod error;
pub mod worker;

pub use cache::LiveCache;
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use worker::{CycleReport, SyncClient, SyncWorker, WorkerHandle};
