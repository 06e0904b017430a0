use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use log::debug;
use serde::{Deserialize, Serialize};

/// Width of the time bucket a date column is folded into before grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateGranularity {
    #[default]
    None,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse the date formats the record sources emit: ISO dates, naive
/// date-times and RFC 3339 timestamps. The calendar date is taken as
/// written, without converting between offsets.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local().date())
        })
}

/// Canonical bucket label for `raw` at the given granularity.
///
/// `None` and unparsable dates return `raw` untouched.
pub fn bucket(raw: &str, granularity: DateGranularity) -> String {
    if granularity == DateGranularity::None {
        return raw.to_string();
    }
    let Some(date) = parse_date(raw) else {
        debug!("Unparsable date {:?} left unbucketed", raw);
        return raw.to_string();
    };

    match granularity {
        DateGranularity::None => raw.to_string(),
        DateGranularity::Day => date.format("%Y-%m-%d").to_string(),
        DateGranularity::Week => {
            let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            monday.format("Week of %b %-d, %Y").to_string()
        }
        DateGranularity::Month => date.format("%b %Y").to_string(),
        DateGranularity::Quarter => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
        DateGranularity::Year => date.format("%Y").to_string(),
    }
}
