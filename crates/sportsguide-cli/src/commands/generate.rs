use chrono::NaiveDateTime;
use clap::Args;
use sportsguide_core::error::Result;
use sportsguide_core::fetch::read_page;
use sportsguide_core::{Config, EventFields, FieldsPassthrough, HttpFetcher, Pipeline};
use std::path::{Path, PathBuf};

use super::resolve_config_path;

const NOW_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Args)]
pub struct GenerateArgs {
    /// Read the listing page from a saved HTML file instead of fetching it
    #[arg(long, conflicts_with = "records")]
    html: Option<PathBuf>,
    /// Read pre-extracted records from a JSON array of event fields
    #[arg(long)]
    records: Option<PathBuf>,
    /// Listing page URL (overrides source.url)
    #[arg(long, conflicts_with_all = ["html", "records"])]
    url: Option<String>,
    /// XMLTV output path (overrides output.epg_path)
    #[arg(long)]
    epg: Option<PathBuf>,
    /// Text listing output path (overrides output.listing_path)
    #[arg(long)]
    listing: Option<PathBuf>,
    /// Reference time as "YYYY-MM-DD HH:MM" (default: local clock)
    #[arg(long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,
    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, NOW_FORMAT)
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
    if let Some(url) = &args.url {
        config.source.url = url.clone();
    }
    if let Some(epg) = &args.epg {
        config.output.epg_path = epg.clone();
    }
    if let Some(listing) = &args.listing {
        config.output.listing_path = listing.clone();
    }
}

pub fn run(args: GenerateArgs, explicit: Option<&Path>) -> Result<()> {
    let mut config = Config::load_from(&resolve_config_path(explicit)?)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let now = args
        .now
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let pipeline = Pipeline::new(&config);

    let (guide, report) = if let Some(path) = &args.records {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<EventFields> = serde_json::from_str(&content)?;
        pipeline.run(&FieldsPassthrough, &records, now)
    } else {
        let page = match &args.html {
            Some(path) => read_page(path)?,
            None => HttpFetcher::new(&config.source)?.fetch_blocking()?,
        };
        pipeline.run_page(&page, now)?
    };

    pipeline.write_outputs(&guide)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} records: {} placed, {} unplaced, {} finished, {} beyond horizon",
            report.records,
            report.placed,
            report.unplaced,
            report.discarded_finished,
            report.discarded_beyond_horizon,
        );
        println!(
            "Created {} and {} with {} placed events.",
            config.output.epg_path.display(),
            config.output.listing_path.display(),
            guide.event_count(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parse_now_accepts_minutes() {
        let now = parse_now("2026-10-17 10:05").unwrap();
        assert_eq!(now.date(), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!((now.hour(), now.minute()), (10, 5));
    }

    #[test]
    fn parse_now_rejects_other_shapes() {
        assert!(parse_now("2026-10-17").is_err());
        assert!(parse_now("10:05").is_err());
    }
}
