use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Weekday};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;

use crate::config::AppConfig;
use crate::db::repository::{HabitRepo, ProgressRepo};
use crate::error::PaceError;
use crate::models::{Habit, NewHabit, Streak, WeeklyGrid};
use crate::stats::{weekly_completion_days, GoalDecision, GoalStatus};
use crate::utils::dates::{format_date, resolve_date, window_start};
use crate::utils::format::{format_goal, grid_dots, progress_bar, streak_message, weekday_row};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const BLUE: &str = "\x1b[38;2;0;122;255m";

// ─── Add ─────────────────────────────────────────────────────────────────────

pub fn handle_add(
    conn: &Connection,
    config: &AppConfig,
    name: &str,
    kind: Option<&str>,
    goal: Option<u32>,
    reminder: Option<&str>,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PaceError::EmptyHabitName.into());
    }
    let habit = NewHabit {
        name: name.to_string(),
        kind: kind.unwrap_or(&config.habits.kind).to_string(),
        goal,
        reminder_time: reminder.map(validate_reminder).transpose()?,
    };
    HabitRepo::create(conn, &habit)?;
    println_colored!(GREEN, "  ✓ Added habit: {}", habit.name);
    Ok(())
}

/// Normalise a reminder to "HH:MM"
fn validate_reminder(s: &str) -> Result<String, PaceError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| PaceError::InvalidReminder(s.to_string()))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HabitStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub done_today: bool,
}

pub fn habit_statuses(conn: &Connection, today: NaiveDate) -> Result<Vec<HabitStatus>> {
    let done = ProgressRepo::completed_habits_on(conn, today)?;
    Ok(HabitRepo::list(conn)?
        .into_iter()
        .map(|habit| HabitStatus {
            done_today: done.contains(&habit.id),
            habit,
        })
        .collect())
}

pub fn handle_list(conn: &Connection, today: NaiveDate, json: bool) -> Result<()> {
    let statuses = habit_statuses(conn, today)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!();
    if statuses.is_empty() {
        println_colored!(DIM, "  No habits yet. Add one with `pace add <name>`");
        println!();
        return Ok(());
    }
    println_colored!(BLUE, "  Habits");
    println!();
    for s in &statuses {
        let mark = if s.done_today {
            format!("{}✓\x1b[0m", GREEN)
        } else {
            "○".to_string()
        };
        let reminder = s.habit.reminder_time.as_deref().unwrap_or("");
        println!(
            "  {}  {:<24} {:<10} goal {:<8} {}",
            mark,
            s.habit.name,
            s.habit.kind,
            format_goal(s.habit.goal),
            reminder
        );
    }
    println!();
    Ok(())
}

// ─── Done / undo ─────────────────────────────────────────────────────────────

pub fn handle_done(
    conn: &Connection,
    today: NaiveDate,
    habit_name: &str,
    value: Option<u32>,
    date: Option<&str>,
) -> Result<()> {
    let habit = HabitRepo::require(conn, habit_name)?;
    let date = resolve_date(date, today)?;
    ProgressRepo::mark_completed(conn, habit.id, date, value)?;

    match value {
        Some(v) => println_colored!(
            GREEN,
            "  ✓ {} done on {} ({} / goal {})",
            habit.name,
            format_date(date),
            v,
            format_goal(habit.goal)
        ),
        None => println_colored!(GREEN, "  ✓ {} done on {}", habit.name, format_date(date)),
    }

    let completed = ProgressRepo::completed_dates(conn, habit.id)?;
    let streak = Streak::from_dates(&completed, today);
    if streak.current > 0 {
        println_colored!(AMBER, "  {} day streak", streak.current);
    }
    Ok(())
}

pub fn handle_undo(
    conn: &Connection,
    today: NaiveDate,
    habit_name: &str,
    date: Option<&str>,
) -> Result<()> {
    let habit = HabitRepo::require(conn, habit_name)?;
    let date = resolve_date(date, today)?;
    if ProgressRepo::unmark(conn, habit.id, date)? {
        println_colored!(DIM, "  ○ {} cleared for {}", habit.name, format_date(date));
    } else {
        println_colored!(DIM, "  {} was not completed on {}", habit.name, format_date(date));
    }
    Ok(())
}

// ─── Today ───────────────────────────────────────────────────────────────────

pub fn handle_today(conn: &Connection, today: NaiveDate) -> Result<()> {
    let progress = ProgressRepo::daily_progress(conn, today)?;
    let statuses = habit_statuses(conn, today)?;

    println!();
    println_colored!(BLUE, "  Today — {}", format_date(today));
    println!();
    let color = if progress.is_complete() { GREEN } else { AMBER };
    println_colored!(
        color,
        "  {}  {}/{}  ({:.0}%)",
        progress_bar(progress.completed, progress.total, 20),
        progress.completed,
        progress.total,
        progress.completion_ratio() * 100.0
    );
    println!();
    for s in statuses.iter().filter(|s| !s.done_today) {
        println_colored!(DIM, "  ○ {}", s.habit.name);
    }
    println!();
    Ok(())
}

// ─── Streak ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StreakReport {
    pub habit: String,
    pub streak: Streak,
    /// Weekdays completed in the trailing week, Monday first
    pub weekly_days: Vec<String>,
    #[serde(skip)]
    pub weekdays: HashSet<Weekday>,
    pub week: WeeklyGrid,
    pub message: &'static str,
}

pub fn streak_report(conn: &Connection, habit: &Habit, today: NaiveDate) -> Result<StreakReport> {
    let completed = ProgressRepo::completed_dates(conn, habit.id)?;
    let streak = Streak::from_dates(&completed, today);

    let weekdays = weekly_completion_days(&completed, today);
    let mut days: Vec<Weekday> = weekdays.iter().copied().collect();
    days.sort_by_key(|d| d.num_days_from_monday());

    Ok(StreakReport {
        habit: habit.name.clone(),
        message: streak_message(streak.current),
        streak,
        weekly_days: days.iter().map(|d| d.to_string()).collect(),
        weekdays,
        week: WeeklyGrid::for_window(&completed, today),
    })
}

pub fn handle_streak(conn: &Connection, today: NaiveDate, habit_name: &str, json: bool) -> Result<()> {
    let habit = HabitRepo::require(conn, habit_name)?;
    let report = streak_report(conn, &habit, today)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println_colored!(BLUE, "  {}", habit.name);
    println!();
    println_colored!(
        BOLD,
        "  Streak:  {} days current  |  {} days best",
        report.streak.current,
        report.streak.best
    );
    println_colored!(DIM, "  {}", report.message);
    println!();
    println!("  This week:  {}", weekday_row(&report.weekdays));
    println_colored!(
        DIM,
        "  Since {}:  {}  ({}/7)",
        format_date(window_start(today, 7)),
        grid_dots(&report.week),
        report.week.days_done()
    );
    println!();
    Ok(())
}

// ─── Review ──────────────────────────────────────────────────────────────────

/// Run goal adjustment for one habit and persist an updated goal unless
/// `dry_run` is set. Habits without a goal are reported as insufficient.
pub fn review_habit(
    conn: &Connection,
    config: &AppConfig,
    habit: &Habit,
    today: NaiveDate,
    dry_run: bool,
) -> Result<GoalDecision> {
    let Some(current) = habit.goal else {
        return Ok(GoalDecision::Unchanged {
            goal: 0,
            reason: GoalStatus::InsufficientData {
                points: 0,
                required: config.goals.min_data_points,
            },
        });
    };

    let start = window_start(today, config.goals.history_days);
    let history = ProgressRepo::value_history(conn, habit.id, start, today)?;
    let decision = config.goals.policy().next_goal(&history, current);
    log::debug!("review '{}': {:?}", habit.name, decision);

    if let GoalDecision::Updated { goal, .. } = decision {
        if !dry_run {
            HabitRepo::update_goal(conn, habit.id, goal)?;
        }
    }
    Ok(decision)
}

pub fn handle_review(
    conn: &Connection,
    config: &AppConfig,
    today: NaiveDate,
    habit_name: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let habits = match habit_name {
        Some(name) => vec![HabitRepo::require(conn, name)?],
        None => HabitRepo::list(conn)?
            .into_iter()
            .filter(Habit::is_reviewable)
            .collect(),
    };

    println!();
    println_colored!(BLUE, "  Goal review (last {} days)", config.goals.history_days);
    println!();
    if habits.is_empty() {
        println_colored!(DIM, "  No habits with a goal to review");
        println!();
        return Ok(());
    }

    for habit in &habits {
        match review_habit(conn, config, habit, today, dry_run)? {
            GoalDecision::Updated { previous, goal } => {
                let verb = if dry_run { "would move" } else { "updated" };
                println_colored!(GREEN, "  ↑ {}: goal {} {} → {}", habit.name, verb, previous, goal);
            }
            GoalDecision::Unchanged { goal, reason: GoalStatus::Maintained } => {
                println_colored!(BOLD, "  = {}: goal maintained at {}", habit.name, goal);
            }
            GoalDecision::Unchanged { reason, .. } => {
                println_colored!(AMBER, "  ! {}: {}", habit.name, reason);
            }
        }
    }
    println!();
    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

pub fn handle_delete(conn: &Connection, habit_name: &str) -> Result<()> {
    let habit = HabitRepo::require(conn, habit_name)?;
    HabitRepo::delete(conn, habit.id)?;
    println_colored!(RED, "  ✗ Deleted {} and its history", habit.name);
    Ok(())
}
