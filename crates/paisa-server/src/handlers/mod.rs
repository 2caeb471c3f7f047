//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod export;
pub mod goals;
pub mod import;
pub mod insights;
pub mod transactions;

// Re-export all handlers for use in router
pub use auth::*;
pub use budgets::*;
pub use categories::*;
pub use dashboard::*;
pub use export::*;
pub use goals::*;
pub use import::*;
pub use insights::*;
pub use transactions::*;
