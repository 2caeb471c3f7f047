//! Spending insight generation
//!
//! An ordered battery of independent heuristics runs over a snapshot of the
//! user's transaction history. Every heuristic is evaluated (they are not
//! exclusive); each one that fires contributes a human-readable sentence
//! which is persisted and returned for display.

mod budget_overrun;
mod engine;
mod frequent_category;
mod month_over_month;
mod small_purchases;
mod top_category;

pub use budget_overrun::BudgetOverrunHeuristic;
pub use engine::{Heuristic, InsightEngine, TransactionHistory};
pub use frequent_category::FrequentCategoryHeuristic;
pub use month_over_month::MonthOverMonthHeuristic;
pub use small_purchases::SmallPurchasesHeuristic;
pub use top_category::TopCategoryHeuristic;
