//! DOM-query extraction of listing-page event cards.

use scraper::{ElementRef, Html, Selector};

use super::{clean_text, EventFields, RawEventRecord, RecordExtractor};
use crate::config::SelectorSettings;
use crate::error::ExtractError;

/// Finds event cards in a page and reads their fields with CSS selectors.
#[derive(Debug, Clone)]
pub struct CardExtractor {
    card: Selector,
    category: Selector,
    title: Selector,
    time_labels: Selector,
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        field,
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

fn first_text(root: ElementRef<'_>, selector: &Selector) -> Option<String> {
    root.select(selector)
        .find_map(|el| clean_text(&el.text().collect::<String>()))
}

impl CardExtractor {
    /// Compile the configured selectors.
    ///
    /// # Errors
    /// Returns an error naming the first selector that does not parse.
    pub fn new(selectors: &SelectorSettings) -> Result<Self, ExtractError> {
        Ok(Self {
            card: compile("card", &selectors.card)?,
            category: compile("category", &selectors.category)?,
            title: compile("title", &selectors.title)?,
            time_labels: compile("time_labels", &selectors.time_labels)?,
        })
    }

    /// Every card in `page`, in document order.
    pub fn split_cards(&self, page: &str) -> Vec<RawEventRecord> {
        let document = Html::parse_document(page);
        document
            .select(&self.card)
            .enumerate()
            .map(|(index, card)| RawEventRecord {
                index,
                markup: card.html(),
            })
            .collect()
    }
}

impl RecordExtractor for CardExtractor {
    type Record = RawEventRecord;

    fn extract(&self, record: &RawEventRecord) -> EventFields {
        let fragment = Html::parse_fragment(&record.markup);
        let root = fragment.root_element();

        // First label is the date, second the time; either may be missing.
        let mut labels = root
            .select(&self.time_labels)
            .map(|el| clean_text(&el.text().collect::<String>()));

        EventFields {
            category: first_text(root, &self.category),
            title: first_text(root, &self.title),
            date_phrase: labels.next().flatten(),
            time_phrase: labels.next().flatten(),
        }
    }
}
