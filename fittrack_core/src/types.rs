//! Core domain types for the Fittrack system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User accounts
//! - Exercise log entries
//! - Goals and goal progress
//! - Derived analytics (summaries, BMI categories, chart series)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Storage format for log timestamps (second precision)
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for goal dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// User Types
// ============================================================================

/// A registered user account
///
/// Accounts are created once at signup and never mutated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Hex-encoded SHA-256 digest of the password
    pub password_hash: String,
}

// ============================================================================
// Exercise Log Types
// ============================================================================

/// One immutable record of a completed exercise session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: i64,
    pub user_id: i64,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: u32,
    /// Weight lifted in kilograms; `None` means "not recorded"
    pub weight_kg: Option<f64>,
    pub calories: u32,
    pub logged_at: NaiveDateTime,
}

/// Input for logging a new exercise session
///
/// Numeric fields are validated at the input boundary: sets, reps and
/// calories must be strictly positive, and weight (when present) must be
/// strictly positive too.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewExerciseLog {
    pub exercise_name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight_kg: Option<f64>,
    pub calories: u32,
    pub logged_at: NaiveDateTime,
}

// ============================================================================
// Goal Types
// ============================================================================

/// A user-defined target metric with tracked current progress
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    /// Free-text category (e.g. "Weight Loss", "Strength")
    pub goal_type: String,
    pub description: String,
    pub target_value: f64,
    pub current_value: f64,
    /// Free-text unit (e.g. "kg", "km", "reps")
    pub unit: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_completed: bool,
}

/// Input for creating a new goal
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewGoal {
    pub goal_type: String,
    pub description: String,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Analytics Types
// ============================================================================

/// BMI classification bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// Occurrence count for one exercise name
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseFrequency {
    pub name: String,
    pub count: usize,
}

/// Aggregate statistics over a user's full exercise history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub total_workouts: usize,
    pub total_calories: u64,
    /// 0 when there are no logs
    pub avg_sets: f64,
    /// 0 when there are no logs
    pub avg_reps: f64,
    /// Up to five most frequent exercises, descending by count; ties keep
    /// first-encountered order
    pub top_exercises: Vec<ExerciseFrequency>,
    /// Maximum recorded weight per exercise; exercises with no weighted
    /// logs are absent rather than zeroed
    pub max_weights: BTreeMap<String, f64>,
}

/// Which per-log value a chart series tracks
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    Calories,
    Sets,
    Reps,
    Weight,
}

impl ChartMetric {
    pub fn label(&self) -> &'static str {
        match self {
            ChartMetric::Calories => "Calories Burned",
            ChartMetric::Sets => "Sets Completed",
            ChartMetric::Reps => "Reps Completed",
            ChartMetric::Weight => "Weight Lifted",
        }
    }
}

/// One point in a chronologically ordered chart series
///
/// A `None` value marks a point that should render as a gap, not as zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub at: NaiveDateTime,
    pub value: Option<f64>,
}
