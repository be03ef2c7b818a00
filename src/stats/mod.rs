//! Derived habit statistics. Every function here is pure and works on a
//! snapshot handed in by the caller.

pub mod goal;
pub mod streak;
pub mod weekly;

pub use goal::{next_goal, GoalDecision, GoalPolicy, GoalStatus};
pub use streak::{best_streak, current_streak};
pub use weekly::weekly_completion_days;
