// src/models/change.rs

//! Change records produced by comparing two snapshots.

use std::fmt;

use super::EventRecord;

/// Kind of change, used for logging and message styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Updated,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single tracked field changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDelta {
    /// Normalized display values; `None` means the field was absent.
    Values {
        old: Option<String>,
        new: Option<String>,
    },
    /// The content differs but is not echoed (long free text).
    ContentChanged,
}

/// One entry of an update's field-level diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Human-readable field label, e.g. "Start Time"
    pub label: &'static str,
    pub delta: FieldDelta,
}

/// One detected difference between two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeRecord {
    Created(EventRecord),
    Updated {
        event: EventRecord,
        changes: Vec<FieldChange>,
    },
    Removed(EventRecord),
}

impl ChangeRecord {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeRecord::Created(_) => ChangeKind::Created,
            ChangeRecord::Updated { .. } => ChangeKind::Updated,
            ChangeRecord::Removed(_) => ChangeKind::Removed,
        }
    }

    /// The event this change refers to (the new version for updates).
    pub fn event(&self) -> &EventRecord {
        match self {
            ChangeRecord::Created(event)
            | ChangeRecord::Removed(event)
            | ChangeRecord::Updated { event, .. } => event,
        }
    }

    /// Field-level diff; empty for creations and removals.
    pub fn field_changes(&self) -> &[FieldChange] {
        match self {
            ChangeRecord::Updated { changes, .. } => changes,
            _ => &[],
        }
    }

    /// Look up the delta for a field label.
    pub fn delta(&self, label: &str) -> Option<&FieldDelta> {
        self.field_changes()
            .iter()
            .find(|c| c.label == label)
            .map(|c| &c.delta)
    }
}
