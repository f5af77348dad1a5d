//! Derived analytics over a user's exercise and goal history.
//!
//! Everything in this module is a pure function over rows fetched from the
//! store: BMI classification, aggregate workout summaries, goal progress
//! rendering and chart series construction. Nothing here persists state or
//! caches between calls.

use crate::types::{
    BmiCategory, ChartMetric, ExerciseFrequency, ExerciseLog, Goal, SeriesPoint, WorkoutSummary,
};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// BMI
// ============================================================================

/// Compute BMI from weight in kilograms and height in centimetres
///
/// Both inputs must be strictly positive.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return Err(Error::Validation(
            "weight and height must be positive".into(),
        ));
    }

    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

impl BmiCategory {
    /// Classify a BMI value into its band
    ///
    /// Breakpoints: below 18.5 is underweight, [18.5, 24.9) is normal,
    /// [25, 29.9) is overweight, everything else is obese. Note that the
    /// [24.9, 25) band falls through to obese.
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 24.9 {
            BmiCategory::NormalWeight
        } else if (25.0..29.9).contains(&bmi) {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

// ============================================================================
// Workout summary
// ============================================================================

/// Aggregate a user's full exercise history into summary statistics
///
/// An empty history yields zeroed totals and empty rankings rather than an
/// error; averages are guarded against division by zero.
pub fn summarize(logs: &[ExerciseLog]) -> WorkoutSummary {
    let total_workouts = logs.len();
    if total_workouts == 0 {
        return WorkoutSummary::default();
    }

    let total_calories: u64 = logs.iter().map(|l| u64::from(l.calories)).sum();
    let total_sets: u64 = logs.iter().map(|l| u64::from(l.sets)).sum();
    let total_reps: u64 = logs.iter().map(|l| u64::from(l.reps)).sum();

    let avg_sets = total_sets as f64 / total_workouts as f64;
    let avg_reps = total_reps as f64 / total_workouts as f64;

    // Occurrence counts in first-encountered order, so the stable sort below
    // breaks ties in favour of the exercise seen first
    let mut counts: Vec<ExerciseFrequency> = Vec::new();
    for log in logs {
        match counts.iter_mut().find(|c| c.name == log.exercise_name) {
            Some(entry) => entry.count += 1,
            None => counts.push(ExerciseFrequency {
                name: log.exercise_name.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(5);

    // Max recorded weight per exercise; logs without a weight contribute
    // nothing, so purely unweighted exercises never appear
    let mut max_weights: BTreeMap<String, f64> = BTreeMap::new();
    for log in logs {
        if let Some(weight) = log.weight_kg {
            let entry = max_weights.entry(log.exercise_name.clone()).or_insert(weight);
            if weight > *entry {
                *entry = weight;
            }
        }
    }

    WorkoutSummary {
        total_workouts,
        total_calories,
        avg_sets,
        avg_reps,
        top_exercises: counts,
        max_weights,
    }
}

// ============================================================================
// Goal progress
// ============================================================================

/// Progress towards a goal as a percentage of its target
///
/// 0 when the target is not positive.
pub fn goal_progress_percent(goal: &Goal) -> f64 {
    if goal.target_value > 0.0 {
        goal.current_value / goal.target_value * 100.0
    } else {
        0.0
    }
}

/// Human-readable status for a goal
///
/// The completion flag overrides the percentage display.
pub fn goal_status_label(goal: &Goal) -> String {
    if goal.is_completed {
        "Completed".into()
    } else {
        format!("{:.1}%", goal_progress_percent(goal))
    }
}

// ============================================================================
// Chart series
// ============================================================================

/// Build a chronologically ascending series of (timestamp, value) points
/// for the chosen metric
///
/// The weight series contains only logs with a recorded weight. The other
/// metrics emit one point per log timestamp, aligned by exact timestamp
/// lookup; a failed lookup yields a `None`-valued point (a gap) rather than
/// an error.
pub fn chart_series(logs: &[ExerciseLog], metric: ChartMetric) -> Vec<SeriesPoint> {
    if metric == ChartMetric::Weight {
        let mut points: Vec<SeriesPoint> = logs
            .iter()
            .filter_map(|log| {
                log.weight_kg.map(|w| SeriesPoint {
                    at: log.logged_at,
                    value: Some(w),
                })
            })
            .collect();
        points.sort_by_key(|p| p.at);
        return points;
    }

    let mut stamps: Vec<NaiveDateTime> = logs.iter().map(|l| l.logged_at).collect();
    stamps.sort();

    let values: HashMap<NaiveDateTime, f64> = logs
        .iter()
        .map(|log| (log.logged_at, metric_value(log, metric)))
        .collect();

    stamps
        .into_iter()
        .map(|at| SeriesPoint {
            at,
            value: values.get(&at).copied(),
        })
        .collect()
}

fn metric_value(log: &ExerciseLog, metric: ChartMetric) -> f64 {
    match metric {
        ChartMetric::Calories => f64::from(log.calories),
        ChartMetric::Sets => f64::from(log.sets),
        ChartMetric::Reps => f64::from(log.reps),
        // Weight is handled by the filtered path in chart_series
        ChartMetric::Weight => log.weight_kg.unwrap_or(0.0),
    }
}
