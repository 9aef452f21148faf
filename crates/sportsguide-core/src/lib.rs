//! # sportsguide Core Library
//!
//! Turns a live-sports listing page into a multi-channel XMLTV guide and a
//! plain-text event listing. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Extraction**: CSS-selector queries turn listing-page cards into
//!   optional fields
//! - **Normalization**: fields become timestamped events with a fixed duration
//! - **Scheduling**: first-fit placement of events onto a fixed channel pool
//! - **Timeline**: per-channel gap filling with "Signed Off" blocks
//! - **Guide**: XMLTV and text writers
//!
//! ## Key Components
//!
//! - [`Pipeline`]: One run from page markup to guide files
//! - [`EventNormalizer`]: Date/time phrase resolution and horizon filtering
//! - [`ChannelScheduler`]: Conflict-free channel assignment
//! - [`TimelineBuilder`]: Gapless per-channel timelines
//! - [`Config`]: TOML configuration

pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod fetch;
pub mod guide;
pub mod normalize;
pub mod pipeline;
pub mod scheduler;
pub mod timeline;

pub use config::Config;
pub use error::{ConfigError, CoreError, EmitError, ExtractError, FetchError};
pub use event::Event;
pub use extract::{CardExtractor, EventFields, FieldsPassthrough, RawEventRecord, RecordExtractor};
pub use fetch::HttpFetcher;
pub use guide::{GuideWriter, ListingWriter, XmltvWriter};
pub use normalize::{DefaultedField, Discard, EventNormalizer, Normalized};
pub use pipeline::{Pipeline, RunReport};
pub use scheduler::{Channel, ChannelId, ChannelPool, ChannelScheduler};
pub use timeline::{BlockKind, ChannelTimeline, CoverageWindow, Guide, TimelineBlock, TimelineBuilder};
