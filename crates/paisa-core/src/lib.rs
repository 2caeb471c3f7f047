//! Paisa Core Library
//!
//! Shared functionality for the Paisa budget tracker:
//! - Database access and migrations (SQLite behind an r2d2 pool)
//! - Aggregation queries feeding the dashboard charts
//! - Budget evaluation against calendar periods
//! - Spending insight heuristics
//! - Savings goals, quick-save, and progress tracking
//! - Savings tips selection
//! - CSV import/export of transactions

pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod insights;
pub mod models;
pub mod sanitize;
pub mod tips;

pub use dashboard::{DashboardData, RequestContext};
pub use db::{Database, NewBudget, NewGoal};
pub use error::{Error, Result};
pub use export::{ExportOptions, TransactionExport};
pub use import::ImportSummary;
pub use insights::{InsightEngine, TransactionHistory};
