//! Event normalization.
//!
//! Turns extracted [`EventFields`] into a timestamped [`Event`]:
//! - missing category/title fall back to configured placeholders
//! - date phrases: "today", "tomorrow", "<Month> <day>", else today
//! - time phrases: 12-hour clock with meridiem, else the current time
//! - events already in progress start at `now`
//! - events beyond the horizon, or already over, are discarded

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::config::{NormalizeSettings, ScheduleSettings};
use crate::event::{truncate_to_minute, Event};
use crate::extract::EventFields;

/// A field that was missing or unparsable and got a fallback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultedField {
    Category,
    Title,
    Date,
    Time,
}

/// A normalized event plus the fields that were filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub event: Event,
    pub defaulted: Vec<DefaultedField>,
}

/// Why a record produced no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// Starts more than `max_days_ahead` days after now.
    BeyondHorizon { title: String, start: NaiveDateTime },
    /// Ended at or before now.
    Finished { title: String, end: NaiveDateTime },
}

impl Discard {
    pub fn title(&self) -> &str {
        match self {
            Self::BeyondHorizon { title, .. } | Self::Finished { title, .. } => title,
        }
    }
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2})\b",
        )
        .expect("month/day pattern is valid")
    })
}

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*([ap])\.?\s*m\b\.?")
            .expect("clock pattern is valid")
    })
}

/// Resolve a date phrase; `None` means nothing matched and the caller falls back.
fn resolve_date(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let phrase = phrase.trim();
    if phrase.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    if phrase.eq_ignore_ascii_case("tomorrow") {
        return today.succ_opt();
    }

    let caps = month_day_pattern().captures(phrase)?;
    let prefix = caps[1].get(..3)?.to_ascii_lowercase();
    let month = MONTHS.iter().position(|m| *m == prefix)? as u32 + 1;
    let day: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

/// Resolve a 12-hour clock phrase such as "7:30 PM".
fn resolve_time(phrase: &str) -> Option<NaiveTime> {
    let caps = clock_pattern().captures(phrase)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = caps[3].eq_ignore_ascii_case("p");
    let hour24 = hour % 12 + if pm { 12 } else { 0 };
    NaiveTime::from_hms_opt(hour24, minute, 0)
}

/// Builds [`Event`]s from extracted fields.
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    duration: Duration,
    horizon: Duration,
    default_category: String,
    default_title: String,
}

impl EventNormalizer {
    pub fn new(schedule: &ScheduleSettings, defaults: &NormalizeSettings) -> Self {
        Self {
            duration: schedule.event_duration(),
            horizon: schedule.horizon(),
            default_category: defaults.default_category.clone(),
            default_title: defaults.default_title.clone(),
        }
    }

    /// Normalize one record against the clock reading `now`.
    ///
    /// Unparsable fields never fail the record; they are defaulted and
    /// listed in [`Normalized::defaulted`].
    ///
    /// # Errors
    /// Returns a [`Discard`] when the event is over or too far ahead.
    pub fn normalize(&self, fields: &EventFields, now: NaiveDateTime) -> Result<Normalized, Discard> {
        let now = truncate_to_minute(now);
        let mut defaulted = Vec::new();

        let category = match fields.category.as_deref() {
            Some(category) => category.to_string(),
            None => {
                defaulted.push(DefaultedField::Category);
                self.default_category.clone()
            }
        };
        let name = match fields.title.as_deref() {
            Some(name) => name.to_string(),
            None => {
                defaulted.push(DefaultedField::Title);
                self.default_title.clone()
            }
        };
        let title = format!("{category} - {name}");

        let date = match fields
            .date_phrase
            .as_deref()
            .and_then(|p| resolve_date(p, now.date()))
        {
            Some(date) => date,
            None => {
                defaulted.push(DefaultedField::Date);
                now.date()
            }
        };
        let time = match fields.time_phrase.as_deref().and_then(resolve_time) {
            Some(time) => time,
            None => {
                defaulted.push(DefaultedField::Time);
                now.time()
            }
        };

        let start = truncate_to_minute(date.and_time(time));
        // An end past the calendar chrono can represent never airs.
        let Some(end) = start.checked_add_signed(self.duration) else {
            return Err(Discard::BeyondHorizon { title, start });
        };

        if end <= now {
            return Err(Discard::Finished { title, end });
        }

        // In progress: air from now, keep the original end.
        let start = start.max(now);

        // No representable limit means nothing is too far ahead.
        let beyond_horizon = now
            .checked_add_signed(self.horizon)
            .is_some_and(|limit| start > limit);
        if beyond_horizon {
            return Err(Discard::BeyondHorizon { title, start });
        }

        Ok(Normalized {
            event: Event::new(title, start, end),
            defaulted,
        })
    }
}
