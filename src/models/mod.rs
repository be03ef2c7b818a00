pub mod habit;
pub mod progress;
pub mod stats;

pub use habit::{Habit, NewHabit};
pub use progress::DailyValue;
pub use stats::{DailyProgress, GridDay, Streak, WeeklyGrid};
