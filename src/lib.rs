//! Habit tracking: completion storage plus the pure statistics derived from
//! it (streaks, weekly completion, adaptive goals).

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod stats;
pub mod utils;

pub use error::PaceError;
pub use models::{DailyValue, Habit};
pub use stats::{current_streak, next_goal, weekly_completion_days, GoalDecision, GoalStatus};
