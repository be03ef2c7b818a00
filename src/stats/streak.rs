//! Consecutive-day streaks over a set of completion dates.
//!
//! A streak is only live when `today` itself is completed; a day without a
//! completion, including today, resets the current streak to zero.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Consecutive completed days ending at `today`.
///
/// Dates after `today` are ignored.
pub fn current_streak(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut check_date = Some(today);

    while let Some(date) = check_date {
        if !completed.contains(&date) {
            break;
        }
        streak += 1;
        check_date = date.pred_opt();
    }
    streak
}

/// Longest run of consecutive completed days on or before `today`.
pub fn best_streak(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &date in completed.range(..=today) {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == date => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }
    best
}
