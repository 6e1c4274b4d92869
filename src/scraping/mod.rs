pub mod base;
pub mod locate;
pub mod schema;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::models::EventRecord;
use locate::{Block, Source, StrategyKind, TableLocator};
use schema::{Field, Schema, LOCATION_SEPARATOR, MAJOR_MARKER, PLACEHOLDER_NAME};

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("cell selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("link selector"));

/// Why a row did not become an [`EventRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSkip {
    TooFewCells { found: usize, required: usize },
    InvalidStartDate,
}

pub struct Extractor {
    schema: Schema,
    locators: Vec<Box<dyn TableLocator>>,
}

impl Extractor {
    pub fn new(schema: Schema, strategies: &[StrategyKind]) -> Self {
        Self {
            schema,
            locators: strategies.iter().map(|kind| kind.build()).collect(),
        }
    }

    pub fn with_default_strategies(schema: Schema) -> Self {
        Self::new(schema, &StrategyKind::default_order())
    }

    /// Never fails: markup that does not fit yields fewer (or zero) records.
    pub fn extract(&self, html: &str) -> Vec<EventRecord> {
        let document = Html::parse_document(html);

        for locator in &self.locators {
            let source = match locator.locate(&document, &self.schema) {
                Some(source) => source,
                None => {
                    debug!(strategy = locator.name(), "no listing found");
                    continue;
                }
            };
            info!(
                strategy = locator.name(),
                schema = self.schema.name,
                "located tournament listing"
            );
            return match source {
                Source::Table(rows) => self.extract_rows(&rows),
                Source::Blocks(blocks) => extract_blocks(&blocks),
            };
        }

        warn!(schema = self.schema.name, "tournament table not found");
        Vec::new()
    }

    fn extract_rows(&self, rows: &[ElementRef<'_>]) -> Vec<EventRecord> {
        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;

        for (index, row) in rows.iter().enumerate() {
            match self.parse_row(*row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    skipped += 1;
                    debug!(row = index + 1, ?reason, "skipping row");
                }
            }
        }

        info!(kept = records.len(), skipped, "extracted tournament rows");
        records
    }

    pub fn parse_row(&self, row: ElementRef<'_>) -> Result<EventRecord, RowSkip> {
        let cells = row.select(&CELL_SELECTOR).collect::<Vec<_>>();
        if cells.len() < self.schema.min_cells {
            return Err(RowSkip::TooFewCells {
                found: cells.len(),
                required: self.schema.min_cells,
            });
        }
        let columns = &self.schema.columns;
        let text_at = |field: Field| {
            columns
                .index_of(field)
                .and_then(|i| cells.get(i))
                .map(|cell| base::inner_text(*cell))
                .unwrap_or_default()
        };

        let (name, link) = cells
            .get(columns.name)
            .map(|cell| name_and_link(*cell))
            .unwrap_or_else(|| (PLACEHOLDER_NAME.to_string(), String::new()));

        let start_date =
            base::parse_iso_date(&text_at(Field::StartDate)).ok_or(RowSkip::InvalidStartDate)?;
        let end_date = base::parse_iso_date(&text_at(Field::EndDate));

        let summary = build_summary(&name, &text_at(Field::Variant), &text_at(Field::Major));
        let location = build_location(&[
            text_at(Field::City),
            text_at(Field::Region),
            text_at(Field::Country),
        ]);

        Ok(EventRecord::new(summary, start_date, end_date, location, link))
    }
}

fn extract_blocks(blocks: &[Block]) -> Vec<EventRecord> {
    let mut records = Vec::new();
    for block in blocks {
        let dates = base::find_iso_dates(&block.body);
        let start_date = match dates.first() {
            Some(date) => *date,
            None => continue,
        };
        records.push(EventRecord::new(
            build_summary(&block.heading, "", ""),
            start_date,
            dates.get(1).copied(),
            String::new(),
            block.link.clone(),
        ));
    }
    info!(kept = records.len(), "extracted heading blocks");
    records
}

fn name_and_link(cell: ElementRef<'_>) -> (String, String) {
    match cell.select(&LINK_SELECTOR).next() {
        Some(anchor) => {
            let link = anchor.value().attr("href").unwrap_or_default().to_string();
            (base::inner_text(anchor), link)
        }
        None => (PLACEHOLDER_NAME.to_string(), String::new()),
    }
}

pub fn build_summary(name: &str, variant: &str, major: &str) -> String {
    let mut summary = name.to_string();
    if !variant.is_empty() {
        summary.push_str(&format!(" ({variant})"));
    }
    if major.trim().eq_ignore_ascii_case("yes") {
        summary.push_str(MAJOR_MARKER);
    }
    summary
}

/// Joins city, region and country, leaving out the empty ones.
pub fn build_location(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(LOCATION_SEPARATOR)
}
