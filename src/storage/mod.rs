// src/storage/mod.rs

//! Storage abstractions for snapshot persistence.
//!
//! Exactly one snapshot is durable at a time. It is replaced wholesale on
//! every save and read back at the start of every poll cycle.
//!
//! ## File Layout
//!
//! ```text
//! events_db.json            # { "<event id>": { ...event... }, ... }
//! events_db.tmp             # transient, only during a save
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStorage;

/// What a store found when asked for the durable snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSnapshot {
    /// A valid snapshot, possibly with zero events.
    Loaded(Snapshot),
    /// Nothing has been saved yet.
    Absent,
    /// Something was stored but could not be read back.
    Corrupt,
}

impl StoredSnapshot {
    /// The stored events; absent and corrupt state both read as empty.
    pub fn into_snapshot(self) -> Snapshot {
        match self {
            StoredSnapshot::Loaded(snapshot) => snapshot,
            StoredSnapshot::Absent | StoredSnapshot::Corrupt => Snapshot::new(),
        }
    }
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the durable snapshot, reporting absent or unreadable state
    /// instead of failing.
    async fn load_state(&self) -> StoredSnapshot;

    /// Load the durable snapshot. Absent or unreadable state is an empty
    /// snapshot, never an error.
    async fn load(&self) -> Snapshot {
        self.load_state().await.into_snapshot()
    }

    /// Replace the durable snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
