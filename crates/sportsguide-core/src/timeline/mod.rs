//! Timeline construction.
//!
//! This module provides:
//! - Coverage window calculation (now until the next end hour)
//! - Gap filling between scheduled events
//! - The [`Guide`] handed to the writers

mod block;
mod builder;

pub use block::{BlockKind, TimelineBlock};
pub use builder::{
    build_timeline, coverage_end, ChannelTimeline, CoverageWindow, Guide, TimelineBuilder,
};
