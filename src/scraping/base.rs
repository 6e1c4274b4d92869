use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Selector};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));
static ISO_DATE_SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("valid iso date search regex"));

const MAX_YEAR: i32 = 9999;

const USER_AGENT: &str = "NafCalendar/0.1 (+https://member.thenaf.net/)";

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// Parses a strict `YYYY-MM-DD` value. Anything else, including impossible
/// calendar dates, yields `None`. The day after must still have a four digit
/// year, since all-day entries end on the following day.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if !ISO_DATE_RE.is_match(trimmed) {
        return None;
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
    match date.succ_opt() {
        Some(next) if next.year() <= MAX_YEAR => Some(date),
        _ => None,
    }
}

/// All valid `YYYY-MM-DD` dates embedded in free text, in order of appearance.
pub fn find_iso_dates(text: &str) -> Vec<NaiveDate> {
    ISO_DATE_SEARCH_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_iso_date(m.as_str()))
        .collect()
}

pub fn fetch_html(url: &str, timeout: Duration) -> Result<String> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("unable to build http client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request failed for {url}"))?;
    let response = response
        .error_for_status()
        .with_context(|| format!("non-success status for {url}"))?;
    response
        .text()
        .with_context(|| format!("unable to read response body for {url}"))
}
