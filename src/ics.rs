//! iCalendar rendering for extracted tournaments.
//!
//! Output is assembled line by line so the byte layout stays fixed: CRLF after
//! every line, including `END:VCALENDAR`.

use std::cell::Cell;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::EventRecord;

pub const DEFAULT_PROD_ID: &str = "-//Luke//NAF Tournament Calendar//EN";
pub const DEFAULT_UID_DOMAIN: &str = "naf-calendar";

const CRLF: &str = "\r\n";

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub trait UidSource {
    fn next_uid(&self) -> String;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs suffixed with `@domain`.
pub struct RandomUids {
    domain: String,
}

impl RandomUids {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

impl UidSource for RandomUids {
    fn next_uid(&self) -> String {
        format!("{}@{}", Uuid::new_v4(), self.domain)
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `event-1@domain`, `event-2@domain`, ...
pub struct SequentialUids {
    domain: String,
    counter: Cell<u64>,
}

impl SequentialUids {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            counter: Cell::new(0),
        }
    }
}

impl UidSource for SequentialUids {
    fn next_uid(&self) -> String {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        format!("event-{next}@{}", self.domain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// `VALUE=DATE` entries with an exclusive end date.
    #[default]
    AllDay,
    /// UTC timestamps covering each day from 00:00:00 to 23:59:59.
    Timed,
}

pub struct CalendarEncoder<C: Clock, U: UidSource> {
    prod_id: String,
    mode: RenderMode,
    clock: C,
    uids: U,
}

impl CalendarEncoder<SystemClock, RandomUids> {
    pub fn system(prod_id: impl Into<String>, uid_domain: &str, mode: RenderMode) -> Self {
        Self::new(prod_id, mode, SystemClock, RandomUids::new(uid_domain))
    }
}

impl<C: Clock, U: UidSource> CalendarEncoder<C, U> {
    pub fn new(prod_id: impl Into<String>, mode: RenderMode, clock: C, uids: U) -> Self {
        Self {
            prod_id: prod_id.into(),
            mode,
            clock,
            uids,
        }
    }

    pub fn encode(&self, events: &[EventRecord]) -> String {
        let mut lines: Vec<String> = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.prod_id),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
        ];

        let stamp = format_timestamp(self.clock.now());

        for event in events {
            lines.push("BEGIN:VEVENT".to_string());
            lines.push(format!("UID:{}", self.uids.next_uid()));
            lines.push(format!("DTSTAMP:{stamp}"));

            match self.mode {
                RenderMode::AllDay => {
                    lines.push(format!(
                        "DTSTART;VALUE=DATE:{}",
                        format_date(event.start_date())
                    ));
                    lines.push(format!(
                        "DTEND;VALUE=DATE:{}",
                        format_date(exclusive_end(event.end_date()))
                    ));
                }
                RenderMode::Timed => {
                    lines.push(format!(
                        "DTSTART:{}",
                        format_date_time(event.start_date(), false)
                    ));
                    lines.push(format!(
                        "DTEND:{}",
                        format_date_time(event.end_date(), true)
                    ));
                }
            }

            lines.push(format!("SUMMARY:{}", escape_text(event.summary())));

            if !event.location().is_empty() {
                lines.push(format!("LOCATION:{}", escape_text(event.location())));
            }

            if !event.url().is_empty() {
                lines.push(format!("URL:{}", escape_text(event.url())));
            }

            lines.push("END:VEVENT".to_string());
        }

        lines.push("END:VCALENDAR".to_string());

        let mut out = lines.join(CRLF);
        out.push_str(CRLF);
        out
    }
}

/// Backslash goes first so the escapes added afterwards are not doubled.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace("\r\n", "\n")
        .replace('\n', "\\n")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn format_timestamp(moment: DateTime<Utc>) -> String {
    moment.format("%Y%m%dT%H%M%SZ").to_string()
}

fn format_date_time(date: NaiveDate, end_of_day: bool) -> String {
    let time = if end_of_day { "235959" } else { "000000" };
    format!("{}T{time}Z", format_date(date))
}

fn exclusive_end(end: NaiveDate) -> NaiveDate {
    end.succ_opt().unwrap_or(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn record(summary: &str, start: NaiveDate, end: Option<NaiveDate>) -> EventRecord {
        EventRecord::new(
            summary.to_string(),
            start,
            end,
            String::new(),
            String::new(),
        )
    }

    fn encoder(mode: RenderMode) -> CalendarEncoder<FixedClock, SequentialUids> {
        let now = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("valid sample datetime");
        CalendarEncoder::new(
            DEFAULT_PROD_ID,
            mode,
            FixedClock(now),
            SequentialUids::new(DEFAULT_UID_DOMAIN),
        )
    }

    #[test]
    fn renders_exact_document() {
        let event = EventRecord::new(
            "Spring Open (Sevens) [MAJOR]".to_string(),
            date(2024, 5, 10),
            Some(date(2024, 5, 12)),
            "Fresno, CA, USA".to_string(),
            "x".to_string(),
        );
        let ics = encoder(RenderMode::AllDay).encode(&[event]);
        let expected = "BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:-//Luke//NAF Tournament Calendar//EN\r\n\
            CALSCALE:GREGORIAN\r\n\
            METHOD:PUBLISH\r\n\
            BEGIN:VEVENT\r\n\
            UID:event-1@naf-calendar\r\n\
            DTSTAMP:20240102T030405Z\r\n\
            DTSTART;VALUE=DATE:20240510\r\n\
            DTEND;VALUE=DATE:20240513\r\n\
            SUMMARY:Spring Open (Sevens) [MAJOR]\r\n\
            LOCATION:Fresno\\, CA\\, USA\r\n\
            URL:x\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";
        assert_eq!(ics, expected);
    }

    #[test]
    fn empty_input_still_produces_envelope() {
        let ics = encoder(RenderMode::AllDay).encode(&[]);
        assert_eq!(
            ics,
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Luke//NAF Tournament Calendar//EN\r\n\
             CALSCALE:GREGORIAN\r\nMETHOD:PUBLISH\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn single_day_event_ends_next_day() {
        let ics = encoder(RenderMode::AllDay).encode(&[record("Cup", date(2024, 12, 31), None)]);
        assert!(ics.contains("DTSTART;VALUE=DATE:20241231\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250101\r\n"));
    }

    #[test]
    fn end_marker_crosses_month_and_leap_day() {
        let ics = encoder(RenderMode::AllDay).encode(&[
            record("Leap", date(2024, 2, 27), Some(date(2024, 2, 28))),
            record("Leap", date(2024, 2, 28), Some(date(2024, 2, 29))),
            record("Plain", date(2023, 2, 27), Some(date(2023, 2, 28))),
        ]);
        assert!(ics.contains("DTEND;VALUE=DATE:20240229\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20240301\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20230301\r\n"));
    }

    #[test]
    fn timed_mode_uses_timestamps_without_day_shift() {
        let ics = encoder(RenderMode::Timed).encode(&[record(
            "Cup",
            date(2024, 5, 10),
            Some(date(2024, 5, 12)),
        )]);
        assert!(ics.contains("DTSTART:20240510T000000Z\r\n"));
        assert!(ics.contains("DTEND:20240512T235959Z\r\n"));
        assert!(!ics.contains("VALUE=DATE"));
    }

    #[test]
    fn optional_lines_are_omitted_when_empty() {
        let ics = encoder(RenderMode::AllDay).encode(&[record("Cup", date(2024, 1, 1), None)]);
        assert!(!ics.contains("LOCATION:"));
        assert!(!ics.contains("URL:"));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_text(r"a\b"), r"a\\b");
        assert_eq!(escape_text("a,b;c"), r"a\,b\;c");
        assert_eq!(escape_text("line1\nline2"), r"line1\nline2");
        assert_eq!(escape_text("line1\r\nline2"), r"line1\nline2");
        assert_eq!(escape_text(r"\,"), r"\\\,");
        assert_eq!(escape_text("Plain (text) [MAJOR]"), "Plain (text) [MAJOR]");
    }

    #[test]
    fn escaped_summary_has_no_bare_separators() {
        let event = EventRecord::new(
            "Cup; North, South".to_string(),
            date(2024, 1, 1),
            None,
            "Town; Place".to_string(),
            "https://x.test/?a=1;b=2,3".to_string(),
        );
        let ics = encoder(RenderMode::AllDay).encode(&[event]);
        assert!(ics.contains("SUMMARY:Cup\\; North\\, South\r\n"));
        assert!(ics.contains("LOCATION:Town\\; Place\r\n"));
        assert!(ics.contains("URL:https://x.test/?a=1\\;b=2\\,3\r\n"));
    }

    #[test]
    fn every_entry_gets_a_distinct_uid_and_blocks_balance() {
        let events = vec![
            record("A", date(2024, 1, 1), None),
            record("B", date(2024, 1, 2), None),
            record("C", date(2024, 1, 3), None),
        ];
        let ics = encoder(RenderMode::AllDay).encode(&events);
        assert_eq!(ics.matches("BEGIN:VEVENT\r\n").count(), 3);
        assert_eq!(ics.matches("END:VEVENT\r\n").count(), 3);
        assert!(ics.contains("UID:event-3@naf-calendar\r\n"));

        let uids = ics
            .lines()
            .filter(|line| line.starts_with("UID:"))
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(uids.len(), 3);
    }

    #[test]
    fn random_uids_are_unique_and_scoped() {
        let uids = RandomUids::new("naf-calendar");
        let first = uids.next_uid();
        let second = uids.next_uid();
        assert_ne!(first, second);
        assert!(first.ends_with("@naf-calendar"));
    }

    #[test]
    fn every_line_is_crlf_terminated() {
        let ics = encoder(RenderMode::AllDay).encode(&[record("A", date(2024, 1, 1), None)]);
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches('\n').count(), ics.matches("\r\n").count());
    }
}
