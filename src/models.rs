use chrono::NaiveDate;

/// Only built through [`EventRecord::new`], which keeps `end_date >= start_date`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    summary: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    location: String,
    url: String,
}

impl EventRecord {
    pub fn new(
        summary: String,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        location: String,
        url: String,
    ) -> Self {
        let end_date = end_date
            .filter(|end| *end >= start_date)
            .unwrap_or(start_date);
        Self {
            summary,
            start_date,
            end_date,
            location,
            url,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}
