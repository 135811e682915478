//! Time parsing and display for memo timestamps
//!
//! Accepts Unix timestamps, RFC3339 strings and the human-readable formats
//! `dateparser` understands; renders store timestamps as RFC3339 and as a
//! relative "3 hours ago" string.

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use chrono_humanize::HumanTime;

#[derive(Debug, Default, Clone, Copy)]
pub struct TimeLens;

impl TimeLens {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single time string into a `DateTime<Utc>`
    ///
    /// Dates without a time of day are taken at midnight UTC.
    pub fn parse_time_string(&self, time_string: &str) -> anyhow::Result<DateTime<Utc>> {
        let midnight = chrono::NaiveTime::from_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("Failed to create time"))?;

        dateparser::parse_with(time_string, &Utc, midnight).map_err(|_| {
            anyhow!(
                "Input time must be either Unix timestamp or time string compliant with RFC3339: {}",
                time_string
            )
        })
    }

    /// Parse to Unix seconds
    pub fn parse_timestamp(&self, time_string: &str) -> anyhow::Result<i64> {
        self.parse_time_string(time_string).map(|dt| dt.timestamp())
    }

    pub fn rfc3339(&self, ts: i64) -> String {
        DateTime::from_timestamp(ts, 0)
            .unwrap_or_default()
            .to_rfc3339()
    }

    /// Relative description of `ts` as seen from `now`
    pub fn humanize(&self, ts: i64, now: i64) -> String {
        HumanTime::from(Duration::seconds(ts - now)).to_string()
    }
}
