use chrono::Weekday;
use std::collections::HashSet;

use crate::models::WeeklyGrid;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Encouragement shown next to a streak count
pub fn streak_message(days: u32) -> &'static str {
    match days {
        0 => "Start today, build momentum!",
        1..=2 => "You've begun the journey!",
        3..=6 => "Consistency is key! Keep going.",
        7..=13 => "One week strong! You've formed a micro-habit.",
        14..=29 => "Two weeks plus! This is becoming routine.",
        30..=89 => "A full month! This habit is part of you.",
        90..=179 => "Three months of dedication! True commitment.",
        180..=364 => "Half a year! Unstoppable force.",
        _ => "A full year! Legend status achieved!",
    }
}

/// Mon..Sun row with completed weekdays filled in, e.g. "M T W · F · ·"
pub fn weekday_row(days: &HashSet<Weekday>) -> String {
    WEEK.iter()
        .map(|d| {
            if days.contains(d) {
                weekday_initial(*d)
            } else {
                "·"
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Oldest-first dots for the trailing week (● done, ○ not)
pub fn grid_dots(grid: &WeeklyGrid) -> String {
    grid.days
        .iter()
        .map(|d| if d.done { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn weekday_initial(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "M",
        Weekday::Tue => "T",
        Weekday::Wed => "W",
        Weekday::Thu => "T",
        Weekday::Fri => "F",
        Weekday::Sat => "S",
        Weekday::Sun => "S",
    }
}

pub fn format_goal(goal: Option<u32>) -> String {
    match goal {
        Some(g) => g.to_string(),
        None => "—".to_string(),
    }
}
