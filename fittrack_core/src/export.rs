//! CSV export of exercise history.
//!
//! Writes a user's log rows to a headered CSV file so the history can be
//! taken into spreadsheets or other tools. Rows are written in the order
//! they are given (the store returns them newest first).

use crate::types::{ExerciseLog, DATETIME_FORMAT};
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    exercise_name: String,
    sets: u32,
    reps: u32,
    weight_kg: Option<f64>,
    calories: u32,
    logged_at: String,
}

impl From<&ExerciseLog> for CsvRow {
    fn from(log: &ExerciseLog) -> Self {
        CsvRow {
            exercise_name: log.exercise_name.clone(),
            sets: log.sets,
            reps: log.reps,
            weight_kg: log.weight_kg,
            calories: log.calories,
            logged_at: log.logged_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}

/// Write exercise logs to a CSV file, returning the number of rows written
///
/// Creates parent directories as needed and overwrites any existing file.
pub fn export_logs_csv(logs: &[ExerciseLog], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for log in logs {
        writer.serialize(CsvRow::from(log))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} log rows to {:?}", logs.len(), path);
    Ok(logs.len())
}
