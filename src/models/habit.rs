use serde::{Deserialize, Serialize};

/// Tag used when a habit is created without `--kind`
pub const DEFAULT_KIND: &str = "custom";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    /// Free-form tag, e.g. "steps" or "custom"
    pub kind: String,
    pub goal: Option<u32>,
    pub reminder_time: Option<String>,
    pub created_at: String,
}

impl Habit {
    /// Habits with a positive numeric goal take part in goal review.
    pub fn is_reviewable(&self) -> bool {
        self.goal.is_some_and(|g| g > 0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub name: String,
    pub kind: String,
    pub goal: Option<u32>,
    pub reminder_time: Option<String>,
}
