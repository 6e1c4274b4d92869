//! Ranked strategies for finding the tournament listing inside a page.
//!
//! The listing markup has changed shape several times, so instead of betting
//! on one structure the extractor asks each [`TableLocator`] in turn and takes
//! the first source it returns.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::base;
use super::schema::Schema;

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector"));
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector"));
static HEADER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("header cell selector"));
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4").expect("heading selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("link selector"));

/// Where the listing entries were found.
#[derive(Debug)]
pub enum Source<'a> {
    /// Data rows of the selected table, header row excluded.
    Table(Vec<ElementRef<'a>>),
    Blocks(Vec<Block>),
}

/// A heading plus the text that follows it up to the next heading, or up to
/// the next sibling that contains one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub heading: String,
    pub link: String,
    pub body: String,
}

pub trait TableLocator {
    fn name(&self) -> &'static str;
    fn locate<'a>(&self, document: &'a Html, schema: &Schema) -> Option<Source<'a>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    HeaderSequence,
    HeaderKeyword,
    HeadingBlocks,
}

impl StrategyKind {
    pub fn default_order() -> Vec<StrategyKind> {
        vec![
            StrategyKind::HeaderSequence,
            StrategyKind::HeaderKeyword,
            StrategyKind::HeadingBlocks,
        ]
    }

    pub fn build(self) -> Box<dyn TableLocator> {
        match self {
            StrategyKind::HeaderSequence => Box::new(HeaderSequence),
            StrategyKind::HeaderKeyword => Box::new(HeaderKeyword),
            StrategyKind::HeadingBlocks => Box::new(HeadingBlocks),
        }
    }
}

/// Every expected header token appears, in order, in the first row.
pub struct HeaderSequence;

impl TableLocator for HeaderSequence {
    fn name(&self) -> &'static str {
        "header_sequence"
    }

    fn locate<'a>(&self, document: &'a Html, schema: &Schema) -> Option<Source<'a>> {
        first_table_where(document, |headers| {
            headers.len() >= schema.headers.len()
                && schema
                    .headers
                    .iter()
                    .zip(headers)
                    .all(|(expected, actual)| actual.contains(expected))
        })
    }
}

/// Any first-row cell mentions the schema keyword.
pub struct HeaderKeyword;

impl TableLocator for HeaderKeyword {
    fn name(&self) -> &'static str {
        "header_keyword"
    }

    fn locate<'a>(&self, document: &'a Html, schema: &Schema) -> Option<Source<'a>> {
        let keyword = schema.keyword.to_lowercase();
        first_table_where(document, |headers| {
            headers.iter().any(|cell| cell.contains(&keyword))
        })
    }
}

/// Fallback for pages without a usable table: headings followed by text that
/// mentions at least one `YYYY-MM-DD` date.
pub struct HeadingBlocks;

impl TableLocator for HeadingBlocks {
    fn name(&self) -> &'static str {
        "heading_blocks"
    }

    fn locate<'a>(&self, document: &'a Html, _schema: &Schema) -> Option<Source<'a>> {
        let blocks = document
            .select(&HEADING_SELECTOR)
            .filter_map(heading_block)
            .filter(|block| !base::find_iso_dates(&block.body).is_empty())
            .collect::<Vec<_>>();
        if blocks.is_empty() {
            None
        } else {
            Some(Source::Blocks(blocks))
        }
    }
}

/// Lower-cased, trimmed text of the first row's cells.
pub fn header_texts(table: ElementRef<'_>) -> Option<Vec<String>> {
    let first_row = table.select(&ROW_SELECTOR).next()?;
    Some(
        first_row
            .select(&HEADER_CELL_SELECTOR)
            .map(|cell| base::inner_text(cell).to_lowercase())
            .collect(),
    )
}

fn first_table_where<'a, F>(document: &'a Html, matches: F) -> Option<Source<'a>>
where
    F: Fn(&[String]) -> bool,
{
    for table in document.select(&TABLE_SELECTOR) {
        let headers = match header_texts(table) {
            Some(headers) => headers,
            None => continue,
        };
        if matches(headers.as_slice()) {
            let rows = table.select(&ROW_SELECTOR).skip(1).collect();
            return Some(Source::Table(rows));
        }
    }
    None
}

fn heading_block(heading: ElementRef<'_>) -> Option<Block> {
    let title = base::inner_text(heading);
    if title.is_empty() {
        return None;
    }
    let link = base::first_attr(&heading, &LINK_SELECTOR, "href").unwrap_or_default();

    let mut parts = Vec::new();
    for sibling in heading.next_siblings() {
        if let Some(element) = ElementRef::wrap(sibling) {
            let is_heading = matches!(element.value().name(), "h1" | "h2" | "h3" | "h4");
            if is_heading || element.select(&HEADING_SELECTOR).next().is_some() {
                break;
            }
            parts.push(base::inner_text(element));
        } else if let Some(text) = sibling.value().as_text() {
            parts.push(base::clean_text(text));
        }
    }

    Some(Block {
        heading: title,
        link,
        body: base::clean_text(&parts.join(" ")),
    })
}
