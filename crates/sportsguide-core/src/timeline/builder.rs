//! Gapless per-channel timelines.
//!
//! Walks each channel's events in time order and fills every gap, from now
//! to the coverage end, with filler blocks.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::block::TimelineBlock;
use crate::event::truncate_to_minute;
use crate::scheduler::{Channel, ChannelId, ChannelPool};

/// The span every channel timeline must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CoverageWindow {
    /// From `now` (minute-truncated) to the next `end_hour:00` strictly after it.
    pub fn new(now: NaiveDateTime, end_hour: u32) -> Self {
        let start = truncate_to_minute(now);
        Self {
            start,
            end: coverage_end(start, end_hour),
        }
    }
}

/// Next occurrence of `end_hour:00` strictly after `now`: today when that is
/// still ahead, otherwise tomorrow.
pub fn coverage_end(now: NaiveDateTime, end_hour: u32) -> NaiveDateTime {
    let today = now.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(end_hour % 24));
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Build one channel's timeline over `window`.
///
/// Blocks abut: the first starts at `window.start`, each next block starts
/// where the previous ended, and the last ends at `window.end` or at the
/// end of the last event, whichever is later.
pub fn build_timeline(channel: &Channel, window: &CoverageWindow) -> Vec<TimelineBlock> {
    let mut events: Vec<_> = channel.schedule.iter().collect();
    events.sort_by_key(|e| e.start);

    let mut blocks = Vec::with_capacity(events.len() * 2 + 1);
    let mut cursor = window.start;

    for event in events {
        if event.start > cursor {
            blocks.push(TimelineBlock::filler(channel.id, cursor, event.start));
        }
        blocks.push(TimelineBlock::event(
            channel.id,
            event.title.clone(),
            event.start,
            event.end,
        ));
        cursor = event.end;
    }

    if cursor < window.end {
        blocks.push(TimelineBlock::filler(channel.id, cursor, window.end));
    }

    blocks
}

/// One channel's finished timeline.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelTimeline {
    pub id: ChannelId,
    pub blocks: Vec<TimelineBlock>,
}

impl ChannelTimeline {
    /// Real events only, in air order.
    pub fn events(&self) -> impl Iterator<Item = &TimelineBlock> {
        self.blocks.iter().filter(|b| !b.is_filler())
    }
}

/// Everything the writers need for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub generated_at: NaiveDateTime,
    pub coverage: CoverageWindow,
    pub channels: Vec<ChannelTimeline>,
}

impl Guide {
    pub fn event_count(&self) -> usize {
        self.channels.iter().map(|c| c.events().count()).sum()
    }

    pub fn filler_count(&self) -> usize {
        self.channels
            .iter()
            .flat_map(|c| c.blocks.iter())
            .filter(|b| b.is_filler())
            .count()
    }
}

/// Finalizes a populated channel pool into a [`Guide`].
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    end_hour: u32,
}

impl TimelineBuilder {
    pub fn new(end_hour: u32) -> Self {
        Self { end_hour }
    }

    pub fn build_guide(&self, pool: &ChannelPool, now: NaiveDateTime) -> Guide {
        let coverage = CoverageWindow::new(now, self.end_hour);
        let channels = pool
            .channels()
            .iter()
            .map(|channel| ChannelTimeline {
                id: channel.id,
                blocks: build_timeline(channel, &coverage),
            })
            .collect();

        Guide {
            generated_at: coverage.start,
            coverage,
            channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::scheduler::schedule_events;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn game(title: &str, start: NaiveDateTime) -> Event {
        Event::new(title, start, start + Duration::minutes(270))
    }

    fn assert_contiguous(blocks: &[TimelineBlock], window: &CoverageWindow) {
        assert_eq!(blocks.first().unwrap().start, window.start);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap between blocks");
        }
        assert!(blocks.last().unwrap().end >= window.end);
        assert!(blocks.iter().all(|b| b.end > b.start));
    }

    #[test]
    fn coverage_end_later_today_or_tomorrow() {
        assert_eq!(coverage_end(at(17, 1, 30), 4), at(17, 4, 0));
        assert_eq!(coverage_end(at(17, 10, 0), 4), at(18, 4, 0));
        // Exactly at the end hour rolls to tomorrow
        assert_eq!(coverage_end(at(17, 4, 0), 4), at(18, 4, 0));
        assert_eq!(coverage_end(at(17, 23, 59), 0), at(18, 0, 0));
    }

    #[test]
    fn window_truncates_now() {
        let window = CoverageWindow::new(at(17, 10, 0) + Duration::seconds(59), 4);
        assert_eq!(window.start, at(17, 10, 0));
        assert_eq!(window.end, at(18, 4, 0));
    }

    #[test]
    fn empty_channel_is_one_filler() {
        let pool = ChannelPool::new(1);
        let window = CoverageWindow::new(at(17, 10, 0), 4);
        let channel = &pool.channels()[0];
        let blocks = build_timeline(channel, &window);
        assert_eq!(
            blocks,
            vec![TimelineBlock::filler(channel.id, window.start, window.end)]
        );
    }

    #[test]
    fn events_interleave_with_fillers() {
        let (pool, _) = schedule_events(
            vec![game("late", at(17, 19, 0)), game("early", at(17, 12, 0))],
            1,
        );
        let window = CoverageWindow::new(at(17, 10, 0), 4);
        let blocks = build_timeline(&pool.channels()[0], &window);

        let shape: Vec<_> = blocks
            .iter()
            .map(|b| (b.title("Signed Off").to_string(), b.start, b.end))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("Signed Off".to_string(), at(17, 10, 0), at(17, 12, 0)),
                ("early".to_string(), at(17, 12, 0), at(17, 16, 30)),
                ("Signed Off".to_string(), at(17, 16, 30), at(17, 19, 0)),
                ("late".to_string(), at(17, 19, 0), at(17, 23, 30)),
                ("Signed Off".to_string(), at(17, 23, 30), at(18, 4, 0)),
            ]
        );
        assert_contiguous(&blocks, &window);
    }

    #[test]
    fn event_starting_now_has_no_leading_filler() {
        let (pool, _) = schedule_events(vec![game("live", at(17, 10, 0))], 1);
        let window = CoverageWindow::new(at(17, 10, 0), 4);
        let blocks = build_timeline(&pool.channels()[0], &window);
        assert!(!blocks[0].is_filler());
        assert_eq!(blocks.len(), 2);
        assert_contiguous(&blocks, &window);
    }

    #[test]
    fn event_past_coverage_end_extends_timeline() {
        let (pool, _) = schedule_events(vec![game("night", at(18, 2, 0))], 1);
        let window = CoverageWindow::new(at(17, 10, 0), 4);
        let blocks = build_timeline(&pool.channels()[0], &window);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks.last().unwrap().end, at(18, 6, 30));
        assert_contiguous(&blocks, &window);
    }

    #[test]
    fn guide_covers_every_channel() {
        let (pool, _) = schedule_events(
            vec![
                game("NFL - Game 1", at(17, 14, 0)),
                game("NBA - Game 2", at(17, 14, 30)),
                game("NHL - Game 3", at(17, 17, 0)),
            ],
            7,
        );
        let guide = TimelineBuilder::new(4).build_guide(&pool, at(17, 10, 0));

        assert_eq!(guide.channels.len(), 7);
        assert_eq!(guide.event_count(), 3);
        for channel in &guide.channels[..3] {
            assert_eq!(channel.events().count(), 1);
            assert_contiguous(&channel.blocks, &guide.coverage);
        }
        for channel in &guide.channels[3..] {
            assert_eq!(channel.blocks.len(), 1);
            assert!(channel.blocks[0].is_filler());
            assert_eq!(channel.blocks[0].start, guide.coverage.start);
            assert_eq!(channel.blocks[0].end, guide.coverage.end);
        }
    }
}
