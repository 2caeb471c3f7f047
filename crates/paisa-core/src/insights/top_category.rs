//! Top spending category heuristic

use std::collections::HashMap;

use super::engine::{Heuristic, TransactionHistory};

/// Reports the category with the highest expense total in range. Silent
/// when the range has no expense transactions at all.
pub struct TopCategoryHeuristic;

impl Heuristic for TopCategoryHeuristic {
    fn name(&self) -> &'static str {
        "top_category"
    }

    fn evaluate(&self, history: &TransactionHistory) -> Option<String> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for tx in history.expenses_in_range() {
            *totals.entry(tx.category.as_str()).or_insert(0.0) += tx.amount;
        }

        let (category, total) = totals
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;

        Some(format!(
            "Most of your spending went to {} this period, a total of ₹{:.2}.",
            category, total
        ))
    }
}
