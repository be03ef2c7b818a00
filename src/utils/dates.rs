use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};

use crate::error::PaceError;

/// Storage and CLI date format (ISO local date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, PaceError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| PaceError::InvalidDate(s.to_string()))
}

/// Parse an optional `--date` argument, defaulting to `today` and rejecting
/// days after it.
pub fn resolve_date(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let date = match arg {
        Some(s) => parse_date(s)?,
        None => today,
    };
    if date > today {
        return Err(PaceError::FutureDate(format_date(date)).into());
    }
    Ok(date)
}

/// First day of an inclusive window of `days` calendar days ending at `end`.
/// A zero-length window is treated as the single day `end`.
pub fn window_start(end: NaiveDate, days: u32) -> NaiveDate {
    end - Duration::days(i64::from(days.saturating_sub(1)))
}

pub fn in_window(date: NaiveDate, end: NaiveDate, days: u32) -> bool {
    date >= window_start(end, days) && date <= end
}
