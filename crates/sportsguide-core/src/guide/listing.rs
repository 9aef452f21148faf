//! Plain-text event listing.

use std::io::Write;

use super::GuideWriter;
use crate::error::EmitError;
use crate::timeline::Guide;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One stanza per real event, channel by channel, fillers left out:
///
/// ```text
/// Event 1: NFL - Game 1 (Channel 1)
/// 2026-10-17 14:00 - 2026-10-17 18:30
///
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingWriter;

impl GuideWriter for ListingWriter {
    fn write(&self, guide: &Guide, out: &mut dyn Write) -> Result<(), EmitError> {
        let events = guide
            .channels
            .iter()
            .flat_map(|channel| channel.events().map(move |block| (channel.id, block)));

        for (n, (channel, block)) in events.enumerate() {
            writeln!(out, "Event {}: {} (Channel {})", n + 1, block.title(""), channel)?;
            writeln!(
                out,
                "{} - {}",
                block.start.format(TIME_FORMAT),
                block.end.format(TIME_FORMAT)
            )?;
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::scheduler::schedule_events;
    use crate::timeline::TimelineBuilder;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn game(title: &str, start: NaiveDateTime) -> Event {
        Event::new(title, start, start + Duration::minutes(270))
    }

    fn render(events: Vec<Event>) -> String {
        let (pool, _) = schedule_events(events, 7);
        let guide = TimelineBuilder::new(4).build_guide(&pool, at(10, 0));
        let mut out = Vec::new();
        ListingWriter.write(&guide, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn stanzas_are_channel_major_and_numbered() {
        let text = render(vec![
            game("NHL - Game 3", at(17, 0)),
            game("NFL - Game 1", at(14, 0)),
            game("NBA - Game 2", at(14, 30)),
            game("MLS - Game 4", at(19, 0)),
        ]);
        let expected = "\
Event 1: NFL - Game 1 (Channel 1)
2026-10-17 14:00 - 2026-10-17 18:30

Event 2: MLS - Game 4 (Channel 1)
2026-10-17 19:00 - 2026-10-17 23:30

Event 3: NBA - Game 2 (Channel 2)
2026-10-17 14:30 - 2026-10-17 19:00

Event 4: NHL - Game 3 (Channel 3)
2026-10-17 17:00 - 2026-10-17 21:30

";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_guide_writes_nothing() {
        assert_eq!(render(Vec::new()), "");
    }
}
