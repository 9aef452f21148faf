//! Property tests for channel placement and timeline coverage.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use sportsguide_core::config::{NormalizeSettings, ScheduleSettings};
use sportsguide_core::scheduler::schedule_events;
use sportsguide_core::timeline::{build_timeline, CoverageWindow};
use sportsguide_core::{Event, EventFields, EventNormalizer};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 17)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

/// Events starting 0..2 days after now, 15 minutes to 6 hours long.
fn events_strategy() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0i64..2 * 24 * 60, 15i64..=360), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (offset, len))| {
                let start = now() + Duration::minutes(offset);
                Event::new(format!("event {i}"), start, start + Duration::minutes(len))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn no_channel_hosts_overlapping_events(events in events_strategy(), channels in 1usize..8) {
        let (pool, _) = schedule_events(events, channels);
        for channel in pool.channels() {
            for (i, a) in channel.schedule.iter().enumerate() {
                for b in &channel.schedule[i + 1..] {
                    prop_assert!(a.end <= b.start || b.end <= a.start);
                }
            }
        }
    }

    #[test]
    fn every_event_is_placed_or_reported(events in events_strategy(), channels in 0usize..8) {
        let total = events.len();
        let (pool, unplaced) = schedule_events(events, channels);
        prop_assert_eq!(pool.placed_count() + unplaced.len(), total);
    }

    #[test]
    fn timelines_are_contiguous(
        events in events_strategy(),
        channels in 1usize..8,
        end_hour in 0u32..24,
    ) {
        let (pool, _) = schedule_events(events, channels);
        let window = CoverageWindow::new(now(), end_hour);
        for channel in pool.channels() {
            let blocks = build_timeline(channel, &window);
            prop_assert!(!blocks.is_empty());
            prop_assert_eq!(blocks[0].start, window.start);
            for pair in blocks.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            for block in &blocks {
                prop_assert!(block.end > block.start);
            }

            let last_event_end = channel.schedule.iter().map(|e| e.end).max();
            let expected_end = last_event_end.map_or(window.end, |end| end.max(window.end));
            prop_assert_eq!(blocks.last().unwrap().end, expected_end);

            let real = blocks.iter().filter(|b| !b.is_filler()).count();
            prop_assert_eq!(real, channel.schedule.len());
        }
    }

    #[test]
    fn placed_count_never_drops_with_more_channels(events in events_strategy(), channels in 0usize..7) {
        let (smaller, _) = schedule_events(events.clone(), channels);
        let (larger, _) = schedule_events(events, channels + 1);
        prop_assert!(larger.placed_count() >= smaller.placed_count());
    }

    #[test]
    fn more_concurrent_events_than_channels_drops_some(extra in 1usize..5, channels in 1usize..6) {
        // All events share the instant `now + 1h`.
        let events: Vec<_> = (0..channels + extra)
            .map(|i| {
                let start = now() + Duration::minutes(i as i64);
                Event::new(format!("e{i}"), start, now() + Duration::hours(2))
            })
            .collect();
        let (pool, unplaced) = schedule_events(events, channels);
        prop_assert_eq!(pool.placed_count(), channels);
        prop_assert_eq!(unplaced.len(), extra);
    }

    #[test]
    fn future_starts_are_not_truncated(offset in 0i64..7 * 24 * 60) {
        let start = now() + Duration::minutes(offset);
        let fields = EventFields::new(
            "NFL",
            "Game",
            start.format("%B %-d").to_string(),
            start.format("%-I:%M %p").to_string(),
        );
        let normalizer = EventNormalizer::new(&ScheduleSettings::default(), &NormalizeSettings::default());
        let normalized = normalizer.normalize(&fields, now()).unwrap();
        prop_assert_eq!(normalized.event.start, start);
        prop_assert!(normalized.defaulted.is_empty());
    }
}
