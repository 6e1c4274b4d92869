pub mod config;
pub mod ics;
pub mod models;
pub mod output;
pub mod scraping;
mod utils;

#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use config::AppConfig;
use ics::{CalendarEncoder, Clock, UidSource};
use models::EventRecord;
use scraping::Extractor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub output_path: PathBuf,
}

/// Markup in, calendar text out. Never fails: a page without a listing
/// renders as an empty calendar.
pub fn render_calendar<C: Clock, U: UidSource>(
    html: &str,
    extractor: &Extractor,
    encoder: &CalendarEncoder<C, U>,
) -> (Vec<EventRecord>, String) {
    let events = extractor.extract(html);
    let document = encoder.encode(&events);
    (events, document)
}

pub fn run(config_path: Option<&Path>) -> Result<RunSummary> {
    let config = AppConfig::load(config_path).context("failed to load configuration")?;
    let schema = config.resolve_schema()?;
    let extractor = Extractor::new(schema, &config.strategies);
    let encoder =
        CalendarEncoder::system(config.prod_id.clone(), &config.uid_domain, config.render_mode);

    info!(url = %config.source_url, timeout_secs = config.timeout_secs, "fetching tournament listing");
    let html = scraping::base::fetch_html(&config.source_url, config.timeout())?;

    let (events, document) = render_calendar(&html, &extractor, &encoder);

    output::write_atomic(&config.output_path, &document)?;
    info!(
        events = events.len(),
        path = %config.output_path.display(),
        "wrote calendar"
    );

    Ok(RunSummary {
        events: events.len(),
        output_path: config.output_path,
    })
}
