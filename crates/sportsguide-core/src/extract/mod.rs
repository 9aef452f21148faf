//! Structured-record extraction.
//!
//! The normalizer never looks at markup. It consumes [`EventFields`], and
//! anything that can turn a source record into those fields implements
//! [`RecordExtractor`]:
//! - [`CardExtractor`] queries the DOM of a listing-page card
//! - [`FieldsPassthrough`] accepts records that already arrive as fields

mod card;

pub use card::CardExtractor;

use serde::{Deserialize, Serialize};

/// One event card as it was found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventRecord {
    /// Position in document order.
    pub index: usize,
    pub markup: String,
}

/// Typed, optional fields pulled out of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// "Today", "Tomorrow", "October 18", ...
    #[serde(default)]
    pub date_phrase: Option<String>,
    /// "7:30 PM", "LIVE", ...
    #[serde(default)]
    pub time_phrase: Option<String>,
}

impl EventFields {
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        date_phrase: impl Into<String>,
        time_phrase: impl Into<String>,
    ) -> Self {
        Self {
            category: Some(category.into()),
            title: Some(title.into()),
            date_phrase: Some(date_phrase.into()),
            time_phrase: Some(time_phrase.into()),
        }
    }
}

/// Turns an opaque source record into typed fields.
///
/// Extraction is best-effort: a field that cannot be found is `None`, never
/// an error.
pub trait RecordExtractor {
    type Record;

    fn extract(&self, record: &Self::Record) -> EventFields;
}

/// Extractor for records that are already structured (e.g. a JSON dump).
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldsPassthrough;

impl RecordExtractor for FieldsPassthrough {
    type Record = EventFields;

    fn extract(&self, record: &EventFields) -> EventFields {
        record.clone()
    }
}

/// Collapse runs of whitespace and map empty text to `None`.
pub(crate) fn clean_text(text: &str) -> Option<String> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Premier \n League "), Some("Premier League".into()));
        assert_eq!(clean_text(" \t\n"), None);
    }

    #[test]
    fn passthrough_returns_fields_unchanged() {
        let fields = EventFields::new("NFL", "Game 1", "Today", "2:00 PM");
        assert_eq!(FieldsPassthrough.extract(&fields), fields);
    }

    #[test]
    fn fields_deserialize_with_missing_keys() {
        let fields: EventFields = serde_json::from_str(r#"{"title": "Game 1"}"#).unwrap();
        assert_eq!(fields.title.as_deref(), Some("Game 1"));
        assert!(fields.category.is_none());
        assert!(fields.time_phrase.is_none());
    }
}
