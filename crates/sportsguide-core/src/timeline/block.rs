//! Timeline block types.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::scheduler::ChannelId;

/// What occupies a block of airtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    /// A real event
    Event { title: String },
    /// Placeholder keeping the channel gapless
    Filler,
}

/// A half-open span `[start, end)` of one channel's airtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBlock {
    pub channel: ChannelId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl TimelineBlock {
    pub fn event(
        channel: ChannelId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            channel,
            start,
            end,
            kind: BlockKind::Event {
                title: title.into(),
            },
        }
    }

    pub fn filler(channel: ChannelId, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            channel,
            start,
            end,
            kind: BlockKind::Filler,
        }
    }

    pub fn is_filler(&self) -> bool {
        matches!(self.kind, BlockKind::Filler)
    }

    /// Event title, or `filler_title` for filler blocks.
    pub fn title<'a>(&'a self, filler_title: &'a str) -> &'a str {
        match &self.kind {
            BlockKind::Event { title } => title,
            BlockKind::Filler => filler_title,
        }
    }
}
