//! Gallery persistence
//!
//! Durable storage of the invention collection with quota-aware degradation,
//! plus snapshot export/import at the file boundary.

pub mod backend;
pub mod snapshot;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, WriteError};
pub use store::{CommitOutcome, DegradationNotice, GalleryStore};
