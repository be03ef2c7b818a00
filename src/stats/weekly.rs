use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeSet, HashSet};

use crate::utils::dates::in_window;

/// Length of the trailing window, today included.
pub const WEEK_DAYS: u32 = 7;

/// Weekdays with at least one completion in `[today - 6, today]`.
pub fn weekly_completion_days(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> HashSet<Weekday> {
    completed
        .iter()
        .filter(|&&date| in_window(date, today, WEEK_DAYS))
        .map(|date| date.weekday())
        .collect()
}
