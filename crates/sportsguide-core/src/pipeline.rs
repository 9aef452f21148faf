//! One pass from raw records to written guide files.
//!
//! extract → normalize → schedule → build timelines → emit. Each stage only
//! feeds the next; nothing is written until the whole guide exists.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::{Config, OutputSettings, SelectorSettings};
use crate::error::{EmitError, ExtractError};
use crate::event::Event;
use crate::extract::{CardExtractor, RecordExtractor};
use crate::guide::{write_file, ListingWriter, XmltvWriter};
use crate::normalize::{Discard, EventNormalizer};
use crate::scheduler::{ChannelPool, ChannelScheduler};
use crate::timeline::{Guide, TimelineBuilder};

/// What happened to the records of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub records: usize,
    pub normalized: usize,
    /// Records that needed at least one placeholder or fallback.
    pub defaulted: usize,
    pub discarded_finished: usize,
    pub discarded_beyond_horizon: usize,
    pub placed: usize,
    pub unplaced: usize,
    pub channels_used: usize,
}

/// Runs the scheduling core with one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: EventNormalizer,
    max_channels: usize,
    timeline: TimelineBuilder,
    selectors: SelectorSettings,
    output: OutputSettings,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            normalizer: EventNormalizer::new(&config.schedule, &config.normalize),
            max_channels: config.schedule.max_channels,
            timeline: TimelineBuilder::new(config.schedule.end_hour),
            selectors: config.source.selectors.clone(),
            output: config.output.clone(),
        }
    }

    /// Normalize every record; discarded ones only show up in `report`.
    pub fn normalize_all<E: RecordExtractor>(
        &self,
        extractor: &E,
        records: &[E::Record],
        now: NaiveDateTime,
        report: &mut RunReport,
    ) -> Vec<Event> {
        report.records += records.len();

        let mut events = Vec::with_capacity(records.len());
        for record in records {
            let fields = extractor.extract(record);
            match self.normalizer.normalize(&fields, now) {
                Ok(normalized) => {
                    if !normalized.defaulted.is_empty() {
                        tracing::debug!(
                            title = %normalized.event.title,
                            defaulted = ?normalized.defaulted,
                            "filled in missing fields"
                        );
                        report.defaulted += 1;
                    }
                    report.normalized += 1;
                    events.push(normalized.event);
                }
                Err(discard) => {
                    tracing::debug!(title = discard.title(), reason = ?discard, "discarded record");
                    match discard {
                        Discard::Finished { .. } => report.discarded_finished += 1,
                        Discard::BeyondHorizon { .. } => report.discarded_beyond_horizon += 1,
                    }
                }
            }
        }
        events
    }

    /// Build the guide from already-split records.
    pub fn run<E: RecordExtractor>(
        &self,
        extractor: &E,
        records: &[E::Record],
        now: NaiveDateTime,
    ) -> (Guide, RunReport) {
        let mut report = RunReport::default();
        let events = self.normalize_all(extractor, records, now, &mut report);

        let mut pool = ChannelPool::new(self.max_channels);
        let unplaced = ChannelScheduler.schedule(&mut pool, events);
        report.placed = pool.placed_count();
        report.unplaced = unplaced.len();
        report.channels_used = pool
            .channels()
            .iter()
            .filter(|c| !c.schedule.is_empty())
            .count();

        let guide = self.timeline.build_guide(&pool, now);
        tracing::info!(
            records = report.records,
            placed = report.placed,
            unplaced = report.unplaced,
            channels_used = report.channels_used,
            "guide built"
        );
        (guide, report)
    }

    /// Build the guide from listing-page markup.
    ///
    /// # Errors
    /// Returns an error if a configured selector does not parse.
    pub fn run_page(
        &self,
        page: &str,
        now: NaiveDateTime,
    ) -> Result<(Guide, RunReport), ExtractError> {
        let extractor = CardExtractor::new(&self.selectors)?;
        let records = extractor.split_cards(page);
        tracing::info!(cards = records.len(), "found event cards");
        Ok(self.run(&extractor, &records, now))
    }

    /// Write the XMLTV document and the text listing.
    ///
    /// # Errors
    /// Returns an error if either file cannot be written.
    pub fn write_outputs(&self, guide: &Guide) -> Result<(), EmitError> {
        write_file(&XmltvWriter::new(&self.output), guide, &self.output.epg_path)?;
        write_file(&ListingWriter, guide, &self.output.listing_path)?;
        tracing::info!(
            epg = %self.output.epg_path.display(),
            listing = %self.output.listing_path.display(),
            events = guide.event_count(),
            "wrote guide files"
        );
        Ok(())
    }
}
