//! Single-file SQLite persistence for users, exercise logs and goals.
//!
//! The store owns the database path rather than a live connection: every
//! operation opens a connection, runs one statement (or a small fixed set),
//! and drops the connection again. Each logical operation is a single
//! autocommitted statement, so a failed call never leaves a partial write.

use crate::types::{
    ExerciseLog, Goal, NewExerciseLog, NewGoal, User, DATETIME_FORMAT, DATE_FORMAT,
};
use crate::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};

/// Handle to the on-disk relational store
#[derive(Clone, Debug)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Open the store at the given database file, creating the schema if needed
    ///
    /// Schema creation is idempotent; opening an existing database leaves its
    /// contents untouched.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = path.into();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { db_path };
        store.create_tables()?;
        tracing::debug!("Opened store at {:?}", store.db_path);
        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    fn create_tables(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS exercise_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users (id),
                exercise_name TEXT NOT NULL,
                sets INTEGER NOT NULL,
                reps INTEGER NOT NULL,
                weight_kg REAL,
                calories INTEGER NOT NULL,
                log_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users (id),
                goal_type TEXT NOT NULL,
                description TEXT NOT NULL,
                target_value REAL,
                current_value REAL,
                unit TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT,
                is_completed INTEGER DEFAULT 0
            );",
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert a new user account
    ///
    /// Returns `Ok(false)` without touching the table when the username is
    /// already taken; the uniqueness constraint resolves duplicate-creation
    /// races in favour of the first writer.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<bool> {
        let conn = self.connect()?;
        let result = conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        );

        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                tracing::warn!("Username {:?} already exists", username);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by exact username
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.connect()?;
        let user = conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Exercise logs
    // ------------------------------------------------------------------

    /// Append one immutable exercise log row for the given user
    pub fn log_exercise(&self, user_id: i64, entry: &NewExerciseLog) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO exercise_logs (user_id, exercise_name, sets, reps, weight_kg, calories, log_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                entry.exercise_name,
                entry.sets,
                entry.reps,
                entry.weight_kg,
                entry.calories,
                entry.logged_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;
        tracing::debug!("Logged exercise {:?} for user {}", entry.exercise_name, user_id);
        Ok(())
    }

    /// All exercise logs for a user, most recent first
    ///
    /// Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text, so the
    /// lexicographic `ORDER BY` is also chronological.
    pub fn exercise_logs(&self, user_id: i64) -> Result<Vec<ExerciseLog>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, exercise_name, sets, reps, weight_kg, calories, log_date
             FROM exercise_logs WHERE user_id = ?1 ORDER BY log_date DESC",
        )?;
        let logs = stmt
            .query_map(params![user_id], log_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    /// Insert a new goal for the given user (created incomplete)
    pub fn add_goal(&self, user_id: i64, goal: &NewGoal) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO goals (user_id, goal_type, description, target_value, current_value, unit, start_date, end_date, is_completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)",
            params![
                user_id,
                goal.goal_type,
                goal.description,
                goal.target_value,
                goal.current_value,
                goal.unit,
                goal.start_date.format(DATE_FORMAT).to_string(),
                goal.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )?;
        tracing::debug!("Added goal {:?} for user {}", goal.goal_type, user_id);
        Ok(())
    }

    /// Goals for a user
    ///
    /// With `include_completed` false, only incomplete goals are returned,
    /// soonest end date first. Goals without an end date sort after all dated
    /// ones (the ordering is explicit in the query, not left to the engine's
    /// NULL placement). With `include_completed` true, all goals are returned,
    /// incomplete before completed, each group ordered the same way.
    pub fn goals(&self, user_id: i64, include_completed: bool) -> Result<Vec<Goal>> {
        let conn = self.connect()?;
        let sql = if include_completed {
            "SELECT id, user_id, goal_type, description, target_value, current_value, unit, start_date, end_date, is_completed
             FROM goals WHERE user_id = ?1
             ORDER BY is_completed ASC, end_date IS NULL, end_date ASC"
        } else {
            "SELECT id, user_id, goal_type, description, target_value, current_value, unit, start_date, end_date, is_completed
             FROM goals WHERE user_id = ?1 AND is_completed = 0
             ORDER BY end_date IS NULL, end_date ASC"
        };
        let mut stmt = conn.prepare(sql)?;
        let goals = stmt
            .query_map(params![user_id], goal_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    /// Update a goal's tracked progress
    ///
    /// Always sets the current value; the completion flag is only touched
    /// when the caller supplies one.
    pub fn update_goal_progress(
        &self,
        goal_id: i64,
        current_value: f64,
        completed: Option<bool>,
    ) -> Result<()> {
        let conn = self.connect()?;
        match completed {
            Some(flag) => {
                conn.execute(
                    "UPDATE goals SET current_value = ?1, is_completed = ?2 WHERE id = ?3",
                    params![current_value, flag, goal_id],
                )?;
            }
            None => {
                conn.execute(
                    "UPDATE goals SET current_value = ?1 WHERE id = ?2",
                    params![current_value, goal_id],
                )?;
            }
        }
        Ok(())
    }

    /// Delete a goal by id
    ///
    /// Succeeds whether or not the row existed; no existence check is
    /// performed, so the caller cannot distinguish "deleted" from
    /// "was never there".
    pub fn delete_goal(&self, goal_id: i64) -> Result<()> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM goals WHERE id = ?1", params![goal_id])?;
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Row mapping helpers
// ----------------------------------------------------------------------

fn log_from_row(row: &rusqlite::Row) -> rusqlite::Result<ExerciseLog> {
    Ok(ExerciseLog {
        id: row.get(0)?,
        user_id: row.get(1)?,
        exercise_name: row.get(2)?,
        sets: row.get(3)?,
        reps: row.get(4)?,
        weight_kg: row.get(5)?,
        calories: row.get(6)?,
        logged_at: parse_datetime_column(row, 7)?,
    })
}

fn goal_from_row(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let end_date: Option<String> = row.get(8)?;
    let end_date = match end_date {
        Some(raw) => Some(parse_date(&raw, 8)?),
        None => None,
    };

    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        goal_type: row.get(2)?,
        description: row.get(3)?,
        target_value: row.get(4)?,
        current_value: row.get(5)?,
        unit: row.get(6)?,
        start_date: parse_date(&row.get::<_, String>(7)?, 7)?,
        end_date,
        is_completed: row.get(9)?,
    })
}

fn parse_datetime_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_date(raw: &str, idx: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_store() -> (tempfile::TempDir, Store) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path().join("fitness_tracker.db")).unwrap();
        (temp_dir, store)
    }

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn sample_log(name: &str, logged_at: NaiveDateTime) -> NewExerciseLog {
        NewExerciseLog {
            exercise_name: name.into(),
            sets: 3,
            reps: 10,
            weight_kg: Some(60.0),
            calories: 200,
            logged_at,
        }
    }

    fn sample_goal(end_date: Option<NaiveDate>) -> NewGoal {
        NewGoal {
            goal_type: "Strength".into(),
            description: "Bench press bodyweight".into(),
            target_value: 80.0,
            current_value: 60.0,
            unit: "kg".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date,
        }
    }

    #[test]
    fn test_create_and_get_user() {
        let (_dir, store) = test_store();

        assert!(store.create_user("alice", "digest-a").unwrap());

        let user = store.get_user("alice").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "digest-a");
    }

    #[test]
    fn test_duplicate_username_rejected_and_original_unchanged() {
        let (_dir, store) = test_store();

        assert!(store.create_user("alice", "digest-a").unwrap());
        assert!(!store.create_user("alice", "digest-b").unwrap());

        let user = store.get_user("alice").unwrap().unwrap();
        assert_eq!(user.password_hash, "digest-a");
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let (_dir, store) = test_store();

        assert!(store.create_user("alice", "digest-a").unwrap());
        assert!(store.create_user("Alice", "digest-b").unwrap());
        assert!(store.get_user("ALICE").unwrap().is_none());
    }

    #[test]
    fn test_get_unknown_user_is_absent() {
        let (_dir, store) = test_store();
        assert!(store.get_user("nobody").unwrap().is_none());
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("fitness_tracker.db");

        let store = Store::open(&db_path).unwrap();
        assert!(store.create_user("alice", "digest").unwrap());

        // Re-opening must not clobber existing rows
        let reopened = Store::open(&db_path).unwrap();
        assert!(reopened.get_user("alice").unwrap().is_some());
    }

    #[test]
    fn test_logs_ordered_newest_first_despite_insert_order() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        let user = store.get_user("alice").unwrap().unwrap();

        store
            .log_exercise(user.id, &sample_log("Squat", datetime(2024, 3, 10, 9, 0, 0)))
            .unwrap();
        store
            .log_exercise(user.id, &sample_log("Push-up", datetime(2024, 3, 12, 9, 0, 0)))
            .unwrap();
        store
            .log_exercise(user.id, &sample_log("Plank", datetime(2024, 3, 11, 9, 0, 0)))
            .unwrap();

        let logs = store.exercise_logs(user.id).unwrap();
        let names: Vec<_> = logs.iter().map(|l| l.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Push-up", "Plank", "Squat"]);
    }

    #[test]
    fn test_optional_weight_roundtrip() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        let user = store.get_user("alice").unwrap().unwrap();

        let mut unweighted = sample_log("Plank", datetime(2024, 3, 10, 9, 0, 0));
        unweighted.weight_kg = None;
        store.log_exercise(user.id, &unweighted).unwrap();
        store
            .log_exercise(user.id, &sample_log("Squat", datetime(2024, 3, 11, 9, 0, 0)))
            .unwrap();

        let logs = store.exercise_logs(user.id).unwrap();
        assert_eq!(logs[0].weight_kg, Some(60.0));
        assert_eq!(logs[1].weight_kg, None);
    }

    #[test]
    fn test_logs_are_scoped_to_user() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        store.create_user("bob", "digest").unwrap();
        let alice = store.get_user("alice").unwrap().unwrap();
        let bob = store.get_user("bob").unwrap().unwrap();

        store
            .log_exercise(alice.id, &sample_log("Squat", datetime(2024, 3, 10, 9, 0, 0)))
            .unwrap();

        assert_eq!(store.exercise_logs(alice.id).unwrap().len(), 1);
        assert!(store.exercise_logs(bob.id).unwrap().is_empty());
    }

    #[test]
    fn test_incomplete_goals_ordered_dated_then_open_ended() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        let user = store.get_user("alice").unwrap().unwrap();

        store
            .add_goal(user.id, &sample_goal(None))
            .unwrap();
        store
            .add_goal(user.id, &sample_goal(NaiveDate::from_ymd_opt(2024, 6, 1)))
            .unwrap();
        store
            .add_goal(user.id, &sample_goal(NaiveDate::from_ymd_opt(2024, 3, 1)))
            .unwrap();

        let goals = store.goals(user.id, false).unwrap();
        let end_dates: Vec<_> = goals.iter().map(|g| g.end_date).collect();
        assert_eq!(
            end_dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 1),
                NaiveDate::from_ymd_opt(2024, 6, 1),
                None,
            ]
        );
    }

    #[test]
    fn test_goal_listing_filters_and_groups_completed() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        let user = store.get_user("alice").unwrap().unwrap();

        store
            .add_goal(user.id, &sample_goal(NaiveDate::from_ymd_opt(2024, 3, 1)))
            .unwrap();
        store
            .add_goal(user.id, &sample_goal(NaiveDate::from_ymd_opt(2024, 2, 1)))
            .unwrap();

        // Complete the goal ending in March
        let march = store
            .goals(user.id, false)
            .unwrap()
            .into_iter()
            .find(|g| g.end_date == NaiveDate::from_ymd_opt(2024, 3, 1))
            .unwrap();
        store
            .update_goal_progress(march.id, 80.0, Some(true))
            .unwrap();

        let active = store.goals(user.id, false).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].end_date, NaiveDate::from_ymd_opt(2024, 2, 1));

        let all = store.goals(user.id, true).unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all[0].is_completed);
        assert!(all[1].is_completed);
    }

    #[test]
    fn test_progress_update_without_flag_leaves_completion_alone() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        let user = store.get_user("alice").unwrap().unwrap();

        store.add_goal(user.id, &sample_goal(None)).unwrap();
        let goal = store.goals(user.id, false).unwrap().remove(0);

        store.update_goal_progress(goal.id, 70.0, None).unwrap();
        let goal = store.goals(user.id, true).unwrap().remove(0);
        assert_eq!(goal.current_value, 70.0);
        assert!(!goal.is_completed);

        store.update_goal_progress(goal.id, 80.0, Some(true)).unwrap();
        let goal = store.goals(user.id, true).unwrap().remove(0);
        assert_eq!(goal.current_value, 80.0);
        assert!(goal.is_completed);
    }

    #[test]
    fn test_delete_goal_succeeds_for_missing_row() {
        let (_dir, store) = test_store();

        // No row with this id exists; the delete still reports success
        assert!(store.delete_goal(4242).is_ok());
    }

    #[test]
    fn test_delete_goal_removes_row() {
        let (_dir, store) = test_store();
        store.create_user("alice", "digest").unwrap();
        let user = store.get_user("alice").unwrap().unwrap();

        store.add_goal(user.id, &sample_goal(None)).unwrap();
        let goal = store.goals(user.id, false).unwrap().remove(0);

        store.delete_goal(goal.id).unwrap();
        assert!(store.goals(user.id, true).unwrap().is_empty());
    }
}
