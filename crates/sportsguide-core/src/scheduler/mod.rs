//! Channel scheduler.
//!
//! Assigns events to a fixed pool of virtual channels:
//! - events are taken in start order (ties keep extraction order)
//! - each goes to the lowest-numbered channel where it overlaps nothing
//! - events that fit nowhere are handed back as unplaced

use serde::Serialize;
use std::fmt;

use crate::event::Event;

/// 1-based channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChannelId(usize);

impl ChannelId {
    /// Channel number `index`, counting from 1.
    pub fn new(index: usize) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A virtual channel and the events placed on it, in placement order.
#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    pub id: ChannelId,
    pub schedule: Vec<Event>,
}

impl Channel {
    fn new(id: ChannelId) -> Self {
        Self {
            id,
            schedule: Vec::new(),
        }
    }

    /// Whether `event` can air here without overlapping anything already placed.
    pub fn is_free_for(&self, event: &Event) -> bool {
        self.schedule.iter().all(|placed| !placed.overlaps(event))
    }
}

/// Fixed-size set of channels, created once per run.
#[derive(Debug, Clone)]
pub struct ChannelPool {
    channels: Vec<Channel>,
}

impl ChannelPool {
    /// `size` channels numbered 1 through `size`.
    pub fn new(size: usize) -> Self {
        Self {
            channels: (1..=size).map(|i| Channel::new(ChannelId(i))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Total events placed across all channels.
    pub fn placed_count(&self) -> usize {
        self.channels.iter().map(|c| c.schedule.len()).sum()
    }

    /// First-fit placement. Gives the event back when every channel is busy.
    pub fn place(&mut self, event: Event) -> Result<ChannelId, Event> {
        match self.channels.iter_mut().find(|c| c.is_free_for(&event)) {
            Some(channel) => {
                channel.schedule.push(event);
                Ok(channel.id)
            }
            None => Err(event),
        }
    }
}

/// Places a batch of events into a pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelScheduler;

impl ChannelScheduler {
    /// Place `events` in start order and return the ones that did not fit.
    pub fn schedule(&self, pool: &mut ChannelPool, mut events: Vec<Event>) -> Vec<Event> {
        // Stable: equal starts keep their extraction order.
        events.sort_by_key(|e| e.start);

        let mut unplaced = Vec::new();
        for event in events {
            match pool.place(event) {
                Ok(channel) => {
                    tracing::trace!(%channel, "placed event");
                }
                Err(event) => {
                    tracing::warn!(
                        title = %event.title,
                        start = %event.start,
                        "skipped event: no free channel slot"
                    );
                    unplaced.push(event);
                }
            }
        }
        unplaced
    }
}

/// Convenience function: fresh pool of `max_channels`, then schedule.
pub fn schedule_events(events: Vec<Event>, max_channels: usize) -> (ChannelPool, Vec<Event>) {
    let mut pool = ChannelPool::new(max_channels);
    let unplaced = ChannelScheduler.schedule(&mut pool, events);
    (pool, unplaced)
}
