// src/models/mod.rs

//! Domain models for the event watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod change;
mod config;
mod event;
mod snapshot;

// Re-export all public types
pub use change::{ChangeKind, ChangeRecord, FieldChange, FieldDelta};
pub use config::{
    Config, NotifierConfig, SourceConfig, StorageConfig, WEBHOOK_ENV, WatchConfig,
    parse_webhook_url,
};
pub use event::{EventRecord, Location, Nested, Server, Vtc};
pub use snapshot::Snapshot;
