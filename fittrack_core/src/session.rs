//! Application session state.
//!
//! `AppSession` holds the currently authenticated user and mediates every
//! UI action into the store and the analytics engine. It is also the error
//! boundary: underlying failures are logged here and surfaced to the UI
//! shell as plain success/absence signals, so the shell never has to
//! distinguish failure causes.

use crate::analytics;
use crate::auth;
use crate::store::Store;
use crate::types::{ChartMetric, ExerciseLog, Goal, NewExerciseLog, NewGoal, SeriesPoint, WorkoutSummary};
use std::path::Path;

/// Identity of the authenticated user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Session state owning the store handle and the logged-in identity
#[derive(Debug)]
pub struct AppSession {
    store: Store,
    current: Option<CurrentUser>,
}

impl AppSession {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// The authenticated user, if any
    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current.as_ref()
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Create a new account
    ///
    /// Returns false when the username is taken or the store fails; the
    /// session is not logged in afterwards either way.
    pub fn sign_up(&mut self, username: &str, password: &str) -> bool {
        match self.store.create_user(username, &auth::hash_password(password)) {
            Ok(created) => created,
            Err(e) => {
                tracing::error!("Signup for {:?} failed: {}", username, e);
                false
            }
        }
    }

    /// Authenticate and populate the session identity
    ///
    /// An unknown username and a wrong password are indistinguishable to the
    /// caller; both leave the session logged out.
    pub fn log_in(&mut self, username: &str, password: &str) -> bool {
        match self.store.get_user(username) {
            Ok(Some(user)) if auth::verify_password(&user.password_hash, password) => {
                tracing::info!("User {:?} logged in", username);
                self.current = Some(CurrentUser {
                    id: user.id,
                    username: user.username,
                });
                true
            }
            Ok(_) => false,
            Err(e) => {
                tracing::error!("Login for {:?} failed: {}", username, e);
                false
            }
        }
    }

    /// Clear the session identity
    pub fn log_out(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!("User {:?} logged out", user.username);
        }
    }

    // ------------------------------------------------------------------
    // Exercise logging
    // ------------------------------------------------------------------

    /// Record one exercise session for the logged-in user
    pub fn log_exercise(&self, entry: &NewExerciseLog) -> bool {
        let Some(user) = &self.current else {
            return false;
        };

        match self.store.log_exercise(user.id, entry) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to log exercise: {}", e);
                false
            }
        }
    }

    /// The logged-in user's history, most recent first
    ///
    /// Empty when logged out or when the store fails (the failure is logged).
    pub fn exercise_logs(&self) -> Vec<ExerciseLog> {
        let Some(user) = &self.current else {
            return Vec::new();
        };

        match self.store.exercise_logs(user.id) {
            Ok(logs) => logs,
            Err(e) => {
                tracing::error!("Failed to load exercise logs: {}", e);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    /// Create a goal for the logged-in user
    pub fn add_goal(&self, goal: &NewGoal) -> bool {
        let Some(user) = &self.current else {
            return false;
        };

        match self.store.add_goal(user.id, goal) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to add goal: {}", e);
                false
            }
        }
    }

    /// The logged-in user's goals
    pub fn goals(&self, include_completed: bool) -> Vec<Goal> {
        let Some(user) = &self.current else {
            return Vec::new();
        };

        match self.store.goals(user.id, include_completed) {
            Ok(goals) => goals,
            Err(e) => {
                tracing::error!("Failed to load goals: {}", e);
                Vec::new()
            }
        }
    }

    /// Update goal progress; the completion flag is only written when supplied
    pub fn update_goal_progress(
        &self,
        goal_id: i64,
        current_value: f64,
        completed: Option<bool>,
    ) -> bool {
        if self.current.is_none() {
            return false;
        }

        match self.store.update_goal_progress(goal_id, current_value, completed) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to update goal {}: {}", goal_id, e);
                false
            }
        }
    }

    /// Delete a goal by id (succeeds even when the row never existed)
    pub fn delete_goal(&self, goal_id: i64) -> bool {
        if self.current.is_none() {
            return false;
        }

        match self.store.delete_goal(goal_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to delete goal {}: {}", goal_id, e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Derived analytics
    // ------------------------------------------------------------------

    /// Aggregate workout statistics for the logged-in user
    pub fn workout_summary(&self) -> WorkoutSummary {
        analytics::summarize(&self.exercise_logs())
    }

    /// Chronological chart series for the chosen metric
    pub fn chart_series(&self, metric: ChartMetric) -> Vec<SeriesPoint> {
        analytics::chart_series(&self.exercise_logs(), metric)
    }

    /// Export the logged-in user's history to a CSV file
    ///
    /// Returns the number of exported rows, or `None` when logged out or on
    /// a write failure.
    pub fn export_history(&self, path: &Path) -> Option<usize> {
        if self.current.is_none() {
            return None;
        }

        match crate::export::export_logs_csv(&self.exercise_logs(), path) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::error!("Failed to export history to {:?}: {}", path, e);
                None
            }
        }
    }
}
