//! Small purchases heuristic

use super::engine::{Heuristic, TransactionHistory};

/// Fires when the range holds more than `min_count` expense transactions
/// under `threshold` currency units.
///
/// The quoted amount is a fixed ₹5-per-purchase estimate, not the actual
/// sum of the qualifying transactions.
pub struct SmallPurchasesHeuristic {
    pub threshold: f64,
    pub min_count: i64,
}

impl Default for SmallPurchasesHeuristic {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            min_count: 5,
        }
    }
}

impl Heuristic for SmallPurchasesHeuristic {
    fn name(&self) -> &'static str {
        "small_purchases"
    }

    fn evaluate(&self, history: &TransactionHistory) -> Option<String> {
        let count = history
            .expenses_in_range()
            .filter(|t| t.amount < self.threshold)
            .count() as i64;

        // Strictly more than min_count
        if count <= self.min_count {
            return None;
        }

        Some(format!(
            "You made {} purchases under ₹{:.0} this period. Small buys like these can add up to ₹{}.",
            count,
            self.threshold,
            count * 5
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::{CategoryKind, Transaction};

    fn small_expense(amount: f64, day: u32) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            category_id: 0,
            category: "Coffee".to_string(),
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
    fn test_fires_strictly_above_five() {
        // Exactly 5 qualifying purchases: silent
        let five: Vec<_> = (1..=5).map(|d| small_expense(4.0, d)).collect();
        let history = TransactionHistory::new(range(), five, vec![]);
        assert!(SmallPurchasesHeuristic::default().evaluate(&history).is_none());

        // 6 qualifying purchases: fires
        let six: Vec<_> = (1..=6).map(|d| small_expense(4.0, d)).collect();
        let history = TransactionHistory::new(range(), six, vec![]);
        let text = SmallPurchasesHeuristic::default().evaluate(&history).unwrap();
        assert!(text.contains("6 purchases"));
        // Fixed per-purchase estimate, 6 x 5
        assert!(text.contains("₹30"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Purchases of exactly 10 do not qualify
        let txs: Vec<_> = (1..=8).map(|d| small_expense(10.0, d)).collect();
        let history = TransactionHistory::new(range(), txs, vec![]);
        assert!(SmallPurchasesHeuristic::default().evaluate(&history).is_none());
    }
}
