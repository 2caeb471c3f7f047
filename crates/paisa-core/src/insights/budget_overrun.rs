//! Largest budget overrun heuristic

use super::engine::{Heuristic, TransactionHistory};

/// Among budgets whose spend has passed their limit, reports the one with
/// the highest spent-to-budget ratio.
pub struct BudgetOverrunHeuristic;

impl Heuristic for BudgetOverrunHeuristic {
    fn name(&self) -> &'static str {
        "budget_overrun"
    }

    fn evaluate(&self, history: &TransactionHistory) -> Option<String> {
        let worst = history
            .budgets
            .iter()
            .filter(|b| b.spent > b.amount && b.amount > 0.0)
            .max_by(|a, b| {
                (a.spent / a.amount)
                    .partial_cmp(&(b.spent / b.amount))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        Some(format!(
            "You have gone over your {} budget: ₹{:.2} spent against a limit of ₹{:.2}.",
            worst.category, worst.spent, worst.amount
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{BudgetPeriod, BudgetStatus};

    fn status(category: &str, amount: f64, spent: f64) -> BudgetStatus {
        BudgetStatus {
            budget_id: 0,
            category_id: 0,
            category: category.to_string(),
            period: BudgetPeriod::Monthly,
            amount,
            spent,
            percentage: (spent / amount * 100.0).min(100.0),
            remaining: (amount - spent).max(0.0),
            exceeded: spent > amount,
            alert: true,
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
    }

    #[test]
    fn test_picks_highest_ratio_not_amount() {
        let history = TransactionHistory::new(
            range(),
            vec![],
            vec![
                // 1.2x over
                status("Food", 1000.0, 1200.0),
                // 2x over but smaller absolute spend
                status("Coffee", 100.0, 200.0),
            ],
        );
        let text = BudgetOverrunHeuristic.evaluate(&history).unwrap();
        assert!(text.contains("Coffee"), "{}", text);
    }

    #[test]
    fn test_silent_when_nothing_exceeded() {
        let history = TransactionHistory::new(
            range(),
            vec![],
            vec![status("Food", 1000.0, 999.0)],
        );
        assert!(BudgetOverrunHeuristic.evaluate(&history).is_none());
    }
}
