// src/pipeline/mod.rs

//! Pipeline entry points for the event watcher.
//!
//! - `diff`: Compare two snapshots into change records
//! - `watch`: Poll, diff, notify and persist on an interval

pub mod diff;
pub mod watch;

pub use diff::{ChangeSummary, compare, detect_changes};
pub use watch::{CycleReport, LoopExit, LoopState, Timing, Watcher, supervise};
