//! Date parsing and normalization.
//!
//! User input arrives as free text ("2024-01-31", "today", "2024-01-31 14:00").
//! Task dates are persisted as Unix timestamps and project dates as ISO
//! `YYYY-MM-DD` strings; both conversions go through [`DateParser`] so they
//! share one time zone.

use chrono::{DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Date-only input formats, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y_%m_%d", "%d/%m/%Y"];

/// Date and time input formats, tried in order.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
];

/// Converts free-text dates into persisted representations.
#[derive(Debug, Clone)]
pub struct DateParser {
    tz: Tz,
    fixed_now: Option<DateTime<Utc>>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl DateParser {
    /// Creates a parser that interprets dates in `tz`.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            fixed_now: None,
        }
    }

    /// Creates a parser from an IANA time zone name (e.g. `Europe/Paris`).
    ///
    /// Returns `None` if the name is unknown.
    pub fn from_timezone_name(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(Self::new)
    }

    /// Pins "now" to a fixed instant.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Returns the configured time zone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Returns the current instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// Returns the current Unix timestamp.
    pub fn now_timestamp(&self) -> i64 {
        self.now().timestamp()
    }

    /// Returns today's date in the configured time zone.
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.tz).date_naive()
    }

    /// Parses a date, accepting the relative keywords `today`, `tomorrow`,
    /// `yesterday` and `now`.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match text.to_lowercase().as_str() {
            "today" | "now" => return Some(self.today()),
            "tomorrow" => return self.today().checked_add_days(Days::new(1)),
            "yesterday" => return self.today().checked_sub_days(Days::new(1)),
            _ => {}
        }

        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        {
            return Some(date);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&self.tz).date_naive());
        }

        self.parse_naive_datetime(text).map(|dt| dt.date())
    }

    /// Parses a date or date-time into a Unix timestamp.
    ///
    /// Date-only input maps to midnight in the configured time zone; `now`
    /// maps to the current instant.
    pub fn parse_timestamp(&self, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("now") {
            return Some(self.now_timestamp());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.timestamp());
        }

        if let Some(dt) = self.parse_naive_datetime(text) {
            return Some(self.local_timestamp(dt));
        }

        self.parse_date(text).map(|date| self.timestamp_of(date))
    }

    /// Normalizes free text to an ISO `YYYY-MM-DD` date.
    pub fn iso_date(&self, text: &str) -> Option<String> {
        self.parse_date(text).map(|date| date.format("%Y-%m-%d").to_string())
    }

    /// Formats a Unix timestamp as an ISO date in the configured time zone.
    pub fn iso_date_of(&self, timestamp: i64) -> String {
        self.date_of(timestamp).format("%Y-%m-%d").to_string()
    }

    /// Returns the calendar date of a Unix timestamp.
    pub fn date_of(&self, timestamp: i64) -> NaiveDate {
        match self.tz.timestamp_opt(timestamp, 0) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.date_naive(),
            LocalResult::None => NaiveDate::default(),
        }
    }

    /// Returns the timestamp of midnight at the start of `date`.
    pub fn timestamp_of(&self, date: NaiveDate) -> i64 {
        self.local_timestamp(date.and_hms_opt(0, 0, 0).unwrap_or_default())
    }

    /// Returns `[start, end)` timestamps covering the whole of `date`.
    pub fn day_bounds(&self, date: NaiveDate) -> (i64, i64) {
        let start = self.timestamp_of(date);
        let end = date
            .checked_add_days(Days::new(1))
            .map(|next| self.timestamp_of(next))
            .unwrap_or(start + 86_400);
        (start, end)
    }

    /// Splits a timestamp into `[year, month, day]` as used by chart bars.
    pub fn ymd(&self, timestamp: i64) -> [i32; 3] {
        let date = self.date_of(timestamp);
        [date.year(), date.month() as i32, date.day() as i32]
    }

    fn parse_naive_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    }

    fn local_timestamp(&self, dt: NaiveDateTime) -> i64 {
        match self.tz.from_local_datetime(&dt) {
            LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => local.timestamp(),
            // Skipped by a DST jump; read it as UTC rather than failing.
            LocalResult::None => dt.and_utc().timestamp(),
        }
    }
}
