//! Canonical event type shared by the scheduler and the timeline builder.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A schedulable event on the local wall clock.
///
/// Built once by the normalizer and never edited afterwards. `end > start`
/// holds for every instance the normalizer hands out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// `"<category> - <name>"`
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Event {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end,
        }
    }

    /// Two events overlap unless one ends at or before the other starts.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Zero the seconds and sub-second part of a timestamp.
pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}
