use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recorded amount for a quantifiable habit on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: u32,
}

impl DailyValue {
    pub fn new(date: NaiveDate, value: u32) -> Self {
        Self { date, value }
    }
}
