//! Month-over-month expense comparison heuristic

use super::engine::{Heuristic, TransactionHistory};

/// Compares expense totals for the analysis range against the same-length
/// range one month earlier. Fires when the change exceeds
/// `min_percent_change` in either direction; a decrease is phrased as good
/// news. Silent when the earlier range had no expenses, since there is
/// nothing meaningful to compare against.
pub struct MonthOverMonthHeuristic {
    pub min_percent_change: f64,
}

impl Default for MonthOverMonthHeuristic {
    fn default() -> Self {
        Self {
            min_percent_change: 10.0,
        }
    }
}

impl Heuristic for MonthOverMonthHeuristic {
    fn name(&self) -> &'static str {
        "month_over_month"
    }

    fn evaluate(&self, history: &TransactionHistory) -> Option<String> {
        let current: f64 = history.expenses_in_range().map(|t| t.amount).sum();

        let (prev_from, prev_to) = history.previous_range();
        let previous: f64 = history.expenses_in(prev_from, prev_to).map(|t| t.amount).sum();

        if previous <= 0.0 {
            return None;
        }

        let change = (current - previous) / previous * 100.0;
        if change.abs() <= self.min_percent_change {
            return None;
        }

        if change < 0.0 {
            Some(format!(
                "Nice work! You spent {:.0}% less than you did this time last month.",
                change.abs()
            ))
        } else {
            Some(format!(
                "Heads up: your spending is up {:.0}% compared to this time last month.",
                change
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::{CategoryKind, Transaction};

    fn expense(amount: f64, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            category_id: 0,
            category: "Food".to_string(),
            kind: CategoryKind::Expense,
            amount,
            description: String::new(),
            transaction_date: date,
            created_at: Utc::now(),
        }
    }

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
    }

    fn april(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (may(1), may(31))
    }

    #[test]
    fn test_increase_phrased_negatively() {
        // current 120 vs previous 100: +20%
        let history = TransactionHistory::new(
            range(),
            vec![expense(120.0, may(10)), expense(100.0, april(10))],
            vec![],
        );
        let text = MonthOverMonthHeuristic::default().evaluate(&history).unwrap();
        assert!(text.contains("up 20%"), "{}", text);
    }

    #[test]
    fn test_decrease_phrased_positively() {
        // current 80 vs previous 100: -20%
        let history = TransactionHistory::new(
            range(),
            vec![expense(80.0, may(10)), expense(100.0, april(10))],
            vec![],
        );
        let text = MonthOverMonthHeuristic::default().evaluate(&history).unwrap();
        assert!(text.contains("20% less"), "{}", text);
    }

    #[test]
    fn test_silent_when_previous_zero() {
        let history = TransactionHistory::new(range(), vec![expense(80.0, may(10))], vec![]);
        assert!(MonthOverMonthHeuristic::default().evaluate(&history).is_none());
    }

    #[test]
    fn test_silent_within_ten_percent() {
        // +10% exactly is not "more than 10%"
        let history = TransactionHistory::new(
            range(),
            vec![expense(110.0, may(10)), expense(100.0, april(10))],
            vec![],
        );
        assert!(MonthOverMonthHeuristic::default().evaluate(&history).is_none());
    }
}
