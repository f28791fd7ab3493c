//! Publication-time cutoff for assembled records.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use meteo_alerts::AlertRecord;
use tracing::debug;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid cutoff '{0}': expected RFC 3339 or RFC 2822 timestamp")]
    InvalidCutoff(String),

    #[error("Window of {0} hours reaches past the representable date range")]
    WindowOutOfRange(u32),
}

/// Parse a feed `pubDate` such as `Tue, 14 May 2024 10:32:00 -0300`.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw.trim()).ok()
}

/// Oldest publication time a record may have to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(DateTime<FixedOffset>);

impl Cutoff {
    /// Accepts `2024-05-14T00:00:00-03:00` or `Tue, 14 May 2024 00:00:00 -0300`.
    pub fn parse(s: &str) -> Result<Self, FilterError> {
        let s = s.trim();
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .map(Self)
            .map_err(|_| FilterError::InvalidCutoff(s.to_string()))
    }

    pub fn hours_before(now: DateTime<Utc>, hours: u32) -> Result<Self, FilterError> {
        Duration::try_hours(i64::from(hours))
            .and_then(|window| now.checked_sub_signed(window))
            .map(|instant| Self(instant.fixed_offset()))
            .ok_or(FilterError::WindowOutOfRange(hours))
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Records with an unreadable timestamp are kept rather than dropped.
    pub fn keeps(&self, record: &AlertRecord) -> bool {
        match parse_published(&record.published_raw) {
            Some(published) => published >= self.0,
            None => {
                debug!(
                    published = %record.published_raw,
                    "unparseable publication time; keeping record"
                );
                true
            }
        }
    }
}

/// Drop records published before `cutoff`, preserving order.
pub fn apply(records: Vec<AlertRecord>, cutoff: Option<&Cutoff>) -> Vec<AlertRecord> {
    match cutoff {
        Some(cutoff) => records.into_iter().filter(|r| cutoff.keeps(r)).collect(),
        None => records,
    }
}
