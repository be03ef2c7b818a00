use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::stats::streak::{best_streak, current_streak};
use crate::stats::weekly::WEEK_DAYS;
use crate::utils::dates::window_start;

/// Habits completed today out of all habits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub completed: u32,
    pub total: u32,
}

impl DailyProgress {
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

impl Streak {
    pub fn from_dates(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            current: current_streak(completed, today),
            best: best_streak(completed, today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub done: bool,
}

/// The trailing week, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGrid {
    pub days: Vec<GridDay>,
}

impl WeeklyGrid {
    pub fn for_window(completed: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        let days = window_start(today, WEEK_DAYS)
            .iter_days()
            .take(WEEK_DAYS as usize)
            .map(|date| GridDay {
                date,
                weekday: date.weekday(),
                done: completed.contains(&date),
            })
            .collect();
        Self { days }
    }

    pub fn days_done(&self) -> u32 {
        self.days.iter().filter(|d| d.done).count() as u32
    }
}
