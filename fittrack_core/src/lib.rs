#![forbid(unsafe_code)]

//! Core domain model and business logic for the Fittrack system.
//!
//! This crate provides:
//! - Domain types (users, exercise logs, goals, chart series)
//! - Credential hashing
//! - Persistence (single-file SQLite store)
//! - Derived analytics (BMI, workout summaries, chart data)
//! - Session state for the UI shell
//! - Exercise demo catalog and CSV export

pub mod types;
pub mod error;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod analytics;
pub mod export;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use auth::{hash_password, verify_password};
pub use catalog::default_catalog;
pub use config::Config;
pub use store::Store;
pub use analytics::{calculate_bmi, chart_series, goal_progress_percent, goal_status_label, summarize};
pub use export::export_logs_csv;
pub use session::{AppSession, CurrentUser};
