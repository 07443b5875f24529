// src/pipeline/diff.rs

//! Diff calculation between two event snapshots.
//!
//! Events are matched by id. Ids only in the new snapshot are creations, ids
//! only in the old one are removals, and ids in both are compared field by
//! field over a fixed table of tracked fields.

use std::fmt;

use crate::models::{ChangeRecord, EventRecord, FieldChange, FieldDelta, Snapshot};
use crate::utils::time::{TimestampStyle, display_timestamp};

/// Log target receiving full-text audit records of redacted field changes.
pub const AUDIT_TARGET: &str = "eventwatch::audit";

/// A field that participates in update detection.
#[derive(Debug, Clone, Copy)]
pub struct TrackedField {
    /// Label shown in change messages
    pub label: &'static str,
    /// Reduce the field to the value that is compared and displayed
    normalize: fn(&EventRecord) -> Option<String>,
    /// Report a change without echoing old and new values
    redact: bool,
}

impl TrackedField {
    /// Normalized value of this field for `event`; `None` when absent.
    pub fn value(&self, event: &EventRecord) -> Option<String> {
        (self.normalize)(event)
    }
}

/// Tracked fields, in the order changes are reported.
pub const TRACKED_FIELDS: [TrackedField; 9] = [
    TrackedField {
        label: "Name",
        normalize: name,
        redact: false,
    },
    TrackedField {
        label: "Start Time",
        normalize: start_time,
        redact: false,
    },
    TrackedField {
        label: "Meetup Time",
        normalize: meetup_time,
        redact: false,
    },
    TrackedField {
        label: "Server",
        normalize: server,
        redact: false,
    },
    TrackedField {
        label: "Map",
        normalize: map,
        redact: false,
    },
    TrackedField {
        label: "Banner",
        normalize: banner,
        redact: false,
    },
    TrackedField {
        label: "Start Location",
        normalize: start_location,
        redact: false,
    },
    TrackedField {
        label: "End Location",
        normalize: end_location,
        redact: false,
    },
    TrackedField {
        label: "Description",
        normalize: description,
        redact: true,
    },
];

fn name(event: &EventRecord) -> Option<String> {
    event.name.clone()
}

fn start_time(event: &EventRecord) -> Option<String> {
    event
        .start_at
        .as_deref()
        .map(|raw| display_timestamp(raw, TimestampStyle::LongDateTime))
}

fn meetup_time(event: &EventRecord) -> Option<String> {
    event
        .meetup_at
        .as_deref()
        .map(|raw| display_timestamp(raw, TimestampStyle::LongDateTime))
}

fn server(event: &EventRecord) -> Option<String> {
    event.server_name()
}

fn map(event: &EventRecord) -> Option<String> {
    event.map.clone()
}

fn banner(event: &EventRecord) -> Option<String> {
    event.banner.clone()
}

fn start_location(event: &EventRecord) -> Option<String> {
    event.departure.as_ref().map(|l| l.display())
}

fn end_location(event: &EventRecord) -> Option<String> {
    event.arrive.as_ref().map(|l| l.display())
}

fn description(event: &EventRecord) -> Option<String> {
    event.description.clone()
}

/// Compare two versions of the same event over the tracked fields.
///
/// Returns one entry per field whose normalized value differs, in
/// [`TRACKED_FIELDS`] order.
pub fn compare(old: &EventRecord, new: &EventRecord) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for field in &TRACKED_FIELDS {
        let old_value = field.value(old);
        let new_value = field.value(new);
        if old_value == new_value {
            continue;
        }

        let delta = if field.redact {
            log::info!(
                target: AUDIT_TARGET,
                "Event {} ({}) {} changed:\nOLD: {}\nNEW: {}",
                new.id,
                new.display_name(),
                field.label.to_lowercase(),
                old_value.as_deref().unwrap_or("<none>"),
                new_value.as_deref().unwrap_or("<none>")
            );
            FieldDelta::ContentChanged
        } else {
            FieldDelta::Values {
                old: old_value,
                new: new_value,
            }
        };

        changes.push(FieldChange {
            label: field.label,
            delta,
        });
    }

    changes
}

/// Compute the changes that turn `old` into `new`.
///
/// Creations and updates come first in `new`'s order, then removals in
/// `old`'s order.
pub fn detect_changes(old: &Snapshot, new: &Snapshot) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for (id, event) in new {
        match old.get(id) {
            None => changes.push(ChangeRecord::Created(event.clone())),
            Some(previous) => {
                let fields = compare(previous, event);
                if !fields.is_empty() {
                    changes.push(ChangeRecord::Updated {
                        event: event.clone(),
                        changes: fields,
                    });
                }
            }
        }
    }

    for (id, event) in old {
        if !new.contains(id) {
            changes.push(ChangeRecord::Removed(event.clone()));
        }
    }

    changes
}

/// Counts of each change kind, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ChangeSummary {
    pub fn of(changes: &[ChangeRecord]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change {
                ChangeRecord::Created(_) => summary.created += 1,
                ChangeRecord::Updated { .. } => summary.updated += 1,
                ChangeRecord::Removed(_) => summary.removed += 1,
            }
        }
        summary
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} updated, {} removed",
            self.created, self.updated, self.removed
        )
    }
}
