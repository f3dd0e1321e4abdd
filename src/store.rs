//! Insert-once timestamp store
//!
//! Maps event names to their string-encoded timestamps for a single run. The
//! first value recorded for a name is authoritative: the engine may re-emit
//! identical notifications from retried stages, and later copies must not move
//! an already-recorded instant.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{TimestampEvent, parse_seconds};

/// Mapping from event name to the first timestamp seen for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampStore {
    entries: HashMap<String, String>,
}

impl TimestampStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `name` unless the name is already present
    ///
    /// Returns `true` when the value was recorded, `false` when it was
    /// discarded as a duplicate.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if let Some(existing) = self.entries.get(&name) {
            warn!(event = %name, kept = %existing, "discarding duplicate timestamp");
            return false;
        }

        let value = value.into();
        debug!(event = %name, value = %value, "recorded timestamp");
        self.entries.insert(name, value);
        true
    }

    /// Records a timestamp event, see [`insert`](Self::insert)
    pub fn record(&mut self, event: TimestampEvent) -> bool {
        self.insert(event.name, event.value)
    }

    /// Returns the timestamp for `name` in seconds
    ///
    /// A value that does not parse as a finite real number is reported as
    /// absent.
    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.entries.get(name).and_then(|raw| parse_seconds(raw))
    }

    /// Returns the raw recorded encoding for `name`
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Whether an entry exists for `name`, well-formed or not
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct event names recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over recorded `(name, raw value)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
