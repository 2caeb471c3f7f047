//! Frequency pattern heuristic

use std::collections::HashMap;

use super::engine::{Heuristic, TransactionHistory};

/// Watches a fixed set of habit-forming categories. A category qualifies
/// when it appears at least its listed number of times in the range; the
/// qualifying category with the highest total gets reported.
pub struct FrequentCategoryHeuristic {
    /// (category name, minimum occurrences)
    watch_list: &'static [(&'static str, usize)],
}

impl Default for FrequentCategoryHeuristic {
    fn default() -> Self {
        Self {
            watch_list: &[("Coffee", 5), ("Dining Out", 5), ("Entertainment", 3)],
        }
    }
}

impl Heuristic for FrequentCategoryHeuristic {
    fn name(&self) -> &'static str {
        "frequent_category"
    }

    fn evaluate(&self, history: &TransactionHistory) -> Option<String> {
        let mut stats: HashMap<&str, (usize, f64)> = HashMap::new();
        for tx in history.expenses_in_range() {
            let entry = stats.entry(tx.category.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += tx.amount;
        }

        let (category, count, total) = self
            .watch_list
            .iter()
            .filter_map(|(name, min_count)| {
                let (count, total) = stats
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| *v)?;
                (count >= *min_count).then_some((*name, count, total))
            })
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))?;

        Some(format!(
            "{} {} purchases this period, totalling ₹{:.2}. That habit is worth keeping an eye on.",
            count, category, total
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::{CategoryKind, Transaction};

    fn expense(category: &str, amount: f64, day: u32) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            category_id: 0,
            category: category.to_string(),
            kind: CategoryKind::Expense,
            amount,
            description: String::new(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 5, day).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
    }

    #[test]
    fn test_entertainment_threshold_is_three() {
        let txs: Vec<_> = (1..=3).map(|d| expense("Entertainment", 200.0, d)).collect();
        let history = TransactionHistory::new(range(), txs, vec![]);
        let text = FrequentCategoryHeuristic::default().evaluate(&history).unwrap();
        assert!(text.contains("Entertainment"));
    }

    #[test]
    fn test_coffee_needs_five() {
        let txs: Vec<_> = (1..=4).map(|d| expense("Coffee", 30.0, d)).collect();
        let history = TransactionHistory::new(range(), txs, vec![]);
        assert!(FrequentCategoryHeuristic::default().evaluate(&history).is_none());
    }

    #[test]
    fn test_reports_highest_total_among_qualifying() {
        let mut txs: Vec<_> = (1..=5).map(|d| expense("Coffee", 30.0, d)).collect();
        txs.extend((6..=10).map(|d| expense("Dining Out", 150.0, d)));
        let history = TransactionHistory::new(range(), txs, vec![]);
        let text = FrequentCategoryHeuristic::default().evaluate(&history).unwrap();
        assert!(text.contains("Dining Out"), "{}", text);
    }

    #[test]
    fn test_unwatched_category_never_fires() {
        let txs: Vec<_> = (1..=10).map(|d| expense("Shopping", 99.0, d)).collect();
        let history = TransactionHistory::new(range(), txs, vec![]);
        assert!(FrequentCategoryHeuristic::default().evaluate(&history).is_none());
    }
}
