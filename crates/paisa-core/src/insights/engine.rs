//! Insight engine - orchestrates heuristic evaluation and persistence

use chrono::{Months, NaiveDate};
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{BudgetStatus, CategoryKind, Insight, Transaction};

use super::{
    BudgetOverrunHeuristic, FrequentCategoryHeuristic, MonthOverMonthHeuristic,
    SmallPurchasesHeuristic, TopCategoryHeuristic,
};

/// Snapshot of a user's transaction history for one analysis run
///
/// Heuristics only see this snapshot, never the database, which keeps them
/// pure and independently testable. The transaction list covers the
/// analysis range plus the same-length range one month earlier, so the
/// month-over-month comparison needs no second query.
pub struct TransactionHistory {
    /// Analysis range, inclusive on both ends
    pub range: (NaiveDate, NaiveDate),
    pub transactions: Vec<Transaction>,
    /// Budget evaluator output as of the end of the range
    pub budgets: Vec<BudgetStatus>,
}

impl TransactionHistory {
    /// Load a snapshot for `user_id` over `range`
    pub fn load(db: &Database, user_id: i64, range: (NaiveDate, NaiveDate)) -> Result<Self> {
        let (prev_start, _) = shifted_back(range);
        let transactions =
            db.list_transactions(user_id, Some(prev_start), Some(range.1), None, i64::MAX, 0)?;
        let budgets = db.evaluate_budgets(user_id, range.1)?;

        Ok(Self {
            range,
            transactions,
            budgets,
        })
    }

    /// Build a snapshot directly (tests)
    pub fn new(
        range: (NaiveDate, NaiveDate),
        transactions: Vec<Transaction>,
        budgets: Vec<BudgetStatus>,
    ) -> Self {
        Self {
            range,
            transactions,
            budgets,
        }
    }

    /// Expense transactions falling inside `[from, to]`
    pub fn expenses_in(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| {
            t.kind == CategoryKind::Expense
                && t.transaction_date >= from
                && t.transaction_date <= to
        })
    }

    /// Expense transactions inside the analysis range
    pub fn expenses_in_range(&self) -> impl Iterator<Item = &Transaction> {
        self.expenses_in(self.range.0, self.range.1)
    }

    /// The same-length range one month earlier
    pub fn previous_range(&self) -> (NaiveDate, NaiveDate) {
        shifted_back(self.range)
    }
}

fn shifted_back(range: (NaiveDate, NaiveDate)) -> (NaiveDate, NaiveDate) {
    (range.0 - Months::new(1), range.1 - Months::new(1))
}

/// A single spending heuristic
///
/// Returns `Some(text)` when it has something to say about the snapshot.
pub trait Heuristic: Send + Sync {
    /// Short identifier for logging
    fn name(&self) -> &'static str;

    fn evaluate(&self, history: &TransactionHistory) -> Option<String>;
}

/// Runs the heuristic battery in a fixed order
pub struct InsightEngine {
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// The built-in battery. Order matters for display, not for firing:
    /// every heuristic always runs.
    pub fn new() -> Self {
        Self {
            heuristics: vec![
                Box::new(TopCategoryHeuristic),
                Box::new(SmallPurchasesHeuristic::default()),
                Box::new(MonthOverMonthHeuristic::default()),
                Box::new(BudgetOverrunHeuristic),
                Box::new(FrequentCategoryHeuristic::default()),
            ],
        }
    }

    pub fn register(&mut self, heuristic: Box<dyn Heuristic>) {
        self.heuristics.push(heuristic);
    }

    /// Evaluate every heuristic against a snapshot, collecting the ones
    /// that fire, in battery order
    pub fn evaluate(&self, history: &TransactionHistory) -> Vec<String> {
        let mut fired = Vec::new();
        for heuristic in &self.heuristics {
            match heuristic.evaluate(history) {
                Some(text) => {
                    debug!(heuristic = heuristic.name(), "Heuristic fired");
                    fired.push(text);
                }
                None => {
                    debug!(heuristic = heuristic.name(), "Heuristic silent");
                }
            }
        }
        fired
    }

    /// Load a snapshot, evaluate, persist each fired insight, and return
    /// the persisted rows for immediate display
    pub fn run_for_user(
        &self,
        db: &Database,
        user_id: i64,
        range: (NaiveDate, NaiveDate),
    ) -> Result<Vec<Insight>> {
        let history = TransactionHistory::load(db, user_id, range)?;
        let fired = self.evaluate(&history);

        let mut persisted = Vec::with_capacity(fired.len());
        for text in fired {
            persisted.push(db.add_insight(user_id, &text)?);
        }

        Ok(persisted)
    }
}
