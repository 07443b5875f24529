// src/models/snapshot.rs

//! Snapshot of all known events, keyed by event id.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use super::EventRecord;

/// The full set of events known at one point in time.
///
/// Serializes as a plain JSON object `{ "<id>": { ...event... } }`.
/// Iteration is ascending by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    events: BTreeMap<String, EventRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event under its own id, replacing any previous entry.
    pub fn insert(&mut self, event: EventRecord) -> Option<EventRecord> {
        self.events.insert(event.id.clone(), event)
    }

    pub fn get(&self, id: &str) -> Option<&EventRecord> {
        self.events.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, EventRecord> {
        self.events.iter()
    }
}

impl FromIterator<EventRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = EventRecord>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for event in iter {
            snapshot.insert(event);
        }
        snapshot
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a EventRecord);
    type IntoIter = btree_map::Iter<'a, String, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
