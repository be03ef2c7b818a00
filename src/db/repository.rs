use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{BTreeSet, HashSet};

use crate::error::PaceError;
use crate::models::{DailyProgress, DailyValue, Habit, NewHabit};
use crate::utils::dates::{format_date, parse_date};

// ─── Habit repo ──────────────────────────────────────────────────────────────

const HABIT_COLUMNS: &str = "id, name, kind, goal, reminder_time, created_at";

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        goal: row.get(3)?,
        reminder_time: row.get(4)?,
        created_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

pub struct HabitRepo;

impl HabitRepo {
    pub fn create(conn: &Connection, habit: &NewHabit) -> Result<i64> {
        if Self::find_by_name(conn, &habit.name)?.is_some() {
            return Err(PaceError::DuplicateHabit(habit.name.clone()).into());
        }
        conn.execute(
            "INSERT INTO habits (name, kind, goal, reminder_time) VALUES (?1, ?2, ?3, ?4)",
            params![habit.name, habit.kind, habit.goal, habit.reminder_time],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("created habit {} '{}'", id, habit.name);
        Ok(id)
    }

    pub fn list(conn: &Connection) -> Result<Vec<Habit>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM habits ORDER BY created_at, id",
            HABIT_COLUMNS
        ))?;
        let rows = stmt.query_map([], habit_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Habit>> {
        conn.query_row(
            &format!("SELECT {} FROM habits WHERE name = ?1 COLLATE NOCASE", HABIT_COLUMNS),
            params![name.trim()],
            habit_from_row,
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    /// Like [`HabitRepo::find_by_name`] but a missing habit is an error.
    pub fn require(conn: &Connection, name: &str) -> Result<Habit> {
        Self::find_by_name(conn, name)?
            .ok_or_else(|| PaceError::HabitNotFound(name.to_string()).into())
    }

    pub fn update_goal(conn: &Connection, habit_id: i64, goal: u32) -> Result<()> {
        let changed = conn.execute(
            "UPDATE habits SET goal = ?1 WHERE id = ?2",
            params![goal, habit_id],
        )?;
        if changed == 0 {
            return Err(PaceError::HabitNotFound(habit_id.to_string()).into());
        }
        log::info!("habit {} goal set to {}", habit_id, goal);
        Ok(())
    }

    /// Remove a habit and all of its progress.
    pub fn delete(conn: &Connection, habit_id: i64) -> Result<bool> {
        conn.execute("DELETE FROM progress WHERE habit_id = ?1", params![habit_id])?;
        let removed = conn.execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;
        Ok(removed > 0)
    }

    pub fn count(conn: &Connection) -> Result<u32> {
        conn.query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))
            .map_err(anyhow::Error::from)
    }
}

// ─── Progress repo ───────────────────────────────────────────────────────────

fn parse_stored_date(habit_id: i64, raw: &str) -> Option<NaiveDate> {
    match parse_date(raw) {
        Ok(d) => Some(d),
        Err(e) => {
            log::warn!("skipping progress row for habit {}: {}", habit_id, e);
            None
        }
    }
}

pub struct ProgressRepo;

impl ProgressRepo {
    /// Record a completion. Marking the same day again replaces its value.
    pub fn mark_completed(
        conn: &Connection,
        habit_id: i64,
        date: NaiveDate,
        value: Option<u32>,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO progress (habit_id, date, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(habit_id, date) DO UPDATE SET value = COALESCE(?3, value)",
            params![habit_id, format_date(date), value],
        )?;
        log::debug!("habit {} completed on {}", habit_id, date);
        Ok(())
    }

    pub fn unmark(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let removed = conn.execute(
            "DELETE FROM progress WHERE habit_id = ?1 AND date = ?2",
            params![habit_id, format_date(date)],
        )?;
        Ok(removed > 0)
    }

    /// Every day the habit was completed on, malformed rows dropped.
    pub fn completed_dates(conn: &Connection, habit_id: i64) -> Result<BTreeSet<NaiveDate>> {
        let mut stmt = conn.prepare("SELECT date FROM progress WHERE habit_id = ?1")?;
        let dates: Vec<String> = stmt
            .query_map(params![habit_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(dates
            .iter()
            .filter_map(|raw| parse_stored_date(habit_id, raw))
            .collect())
    }

    /// Recorded values within `[start, end]`, oldest first. Completions
    /// without a value are not part of the history.
    pub fn value_history(
        conn: &Connection,
        habit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyValue>> {
        let mut stmt = conn.prepare(
            "SELECT date, value FROM progress
             WHERE habit_id = ?1 AND date >= ?2 AND date <= ?3 AND value IS NOT NULL
             ORDER BY date",
        )?;
        let rows: Vec<(String, u32)> = stmt
            .query_map(
                params![habit_id, format_date(start), format_date(end)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(raw, value)| {
                parse_stored_date(habit_id, &raw).map(|date| DailyValue::new(date, value))
            })
            .collect())
    }

    pub fn completed_habits_on(conn: &Connection, date: NaiveDate) -> Result<HashSet<i64>> {
        let mut stmt = conn.prepare("SELECT DISTINCT habit_id FROM progress WHERE date = ?1")?;
        let ids = stmt
            .query_map(params![format_date(date)], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<i64>>>()?;
        Ok(ids)
    }

    pub fn daily_progress(conn: &Connection, date: NaiveDate) -> Result<DailyProgress> {
        let total = HabitRepo::count(conn)?;
        let completed = Self::completed_habits_on(conn, date)?.len() as u32;
        Ok(DailyProgress::new(completed, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn new_habit(name: &str, goal: Option<u32>) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            kind: "steps".to_string(),
            goal,
            reminder_time: Some("07:30".to_string()),
        }
    }

    #[test]
    fn create_and_find_habit() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", Some(8000))).unwrap();

        let habit = HabitRepo::require(&conn, "walk").unwrap();
        assert_eq!(habit.id, id);
        assert_eq!(habit.name, "Walk");
        assert_eq!(habit.kind, "steps");
        assert_eq!(habit.goal, Some(8000));
        assert_eq!(habit.reminder_time.as_deref(), Some("07:30"));
        assert!(habit.is_reviewable());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let conn = conn();
        HabitRepo::create(&conn, &new_habit("Read", None)).unwrap();
        let err = HabitRepo::create(&conn, &new_habit("READ", None)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PaceError>(),
            Some(PaceError::DuplicateHabit(_))
        ));
    }

    #[test]
    fn missing_habit_is_not_found() {
        let conn = conn();
        let err = HabitRepo::require(&conn, "nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PaceError>(),
            Some(PaceError::HabitNotFound(_))
        ));
    }

    #[test]
    fn update_goal_persists() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", Some(100))).unwrap();
        HabitRepo::update_goal(&conn, id, 110).unwrap();
        assert_eq!(HabitRepo::require(&conn, "Walk").unwrap().goal, Some(110));
        assert!(HabitRepo::update_goal(&conn, id + 99, 1).is_err());
    }

    #[test]
    fn completions_collapse_per_day() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", None)).unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 1), Some(100)).unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 1), Some(250)).unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 2), None).unwrap();

        let dates = ProgressRepo::completed_dates(&conn, id).unwrap();
        assert_eq!(dates, BTreeSet::from([d(2024, 5, 1), d(2024, 5, 2)]));

        let history = ProgressRepo::value_history(&conn, id, d(2024, 5, 1), d(2024, 5, 31)).unwrap();
        assert_eq!(history, vec![DailyValue::new(d(2024, 5, 1), 250)]);
    }

    #[test]
    fn remarking_without_value_keeps_previous_value() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", None)).unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 1), Some(100)).unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 1), None).unwrap();
        let history = ProgressRepo::value_history(&conn, id, d(2024, 5, 1), d(2024, 5, 1)).unwrap();
        assert_eq!(history[0].value, 100);
    }

    #[test]
    fn value_history_respects_window() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", None)).unwrap();
        for day in 1..=10 {
            ProgressRepo::mark_completed(&conn, id, d(2024, 5, day), Some(day * 10)).unwrap();
        }
        let history = ProgressRepo::value_history(&conn, id, d(2024, 5, 4), d(2024, 5, 6)).unwrap();
        let values: Vec<u32> = history.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![40, 50, 60]);
    }

    #[test]
    fn malformed_dates_are_skipped() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", None)).unwrap();
        conn.execute(
            "INSERT INTO progress (habit_id, date, value) VALUES (?1, 'not-a-date', 5)",
            params![id],
        )
        .unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 1), None).unwrap();
        let dates = ProgressRepo::completed_dates(&conn, id).unwrap();
        assert_eq!(dates.len(), 1);
    }

    #[test]
    fn unmark_and_delete() {
        let conn = conn();
        let id = HabitRepo::create(&conn, &new_habit("Walk", None)).unwrap();
        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 1), None).unwrap();
        assert!(ProgressRepo::unmark(&conn, id, d(2024, 5, 1)).unwrap());
        assert!(!ProgressRepo::unmark(&conn, id, d(2024, 5, 1)).unwrap());

        ProgressRepo::mark_completed(&conn, id, d(2024, 5, 2), None).unwrap();
        assert!(HabitRepo::delete(&conn, id).unwrap());
        assert!(ProgressRepo::completed_dates(&conn, id).unwrap().is_empty());
        assert!(HabitRepo::list(&conn).unwrap().is_empty());
    }

    #[test]
    fn daily_progress_counts_distinct_habits() {
        let conn = conn();
        let walk = HabitRepo::create(&conn, &new_habit("Walk", None)).unwrap();
        HabitRepo::create(&conn, &new_habit("Read", None)).unwrap();
        HabitRepo::create(&conn, &new_habit("Stretch", None)).unwrap();
        ProgressRepo::mark_completed(&conn, walk, d(2024, 5, 1), None).unwrap();
        ProgressRepo::mark_completed(&conn, walk, d(2024, 4, 30), None).unwrap();

        let progress = ProgressRepo::daily_progress(&conn, d(2024, 5, 1)).unwrap();
        assert_eq!(progress, DailyProgress::new(1, 3));
    }
}
