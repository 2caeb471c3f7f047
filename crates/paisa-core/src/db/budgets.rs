//! Budget operations and the budget evaluator
//!
//! Budgets are always evaluated against the current calendar period: the
//! month for monthly budgets, the Monday-start week for weekly ones.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{params, OptionalExtension, Row};

use super::reports::{month_end, month_start};
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetPeriod, BudgetStatus, CategoryKind};

/// A new budget before DB insertion
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub category_id: i64,
    pub amount: f64,
    pub period: BudgetPeriod,
    /// Percentage at which alerts fire; defaults to 80
    pub alert_threshold: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn row_to_budget(row: &Row) -> rusqlite::Result<Budget> {
    let period: String = row.get(4)?;
    let parse_date = |idx: usize, s: Option<String>| {
        s.map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()
    };
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        period: period.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?,
        alert_threshold: row.get::<_, i64>(5)? as u32,
        start_date: parse_date(6, row.get(6)?)?,
        end_date: parse_date(7, row.get(7)?)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

const BUDGET_COLUMNS: &str =
    "id, user_id, category_id, amount, period, alert_threshold, start_date, end_date, created_at";

/// The calendar window a budget is measured over, as of `today`
pub(crate) fn period_window(period: BudgetPeriod, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        BudgetPeriod::Monthly => (month_start(today), month_end(today)),
        BudgetPeriod::Weekly => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(6))
        }
    }
}

impl Database {
    /// Create a budget on an expense category
    pub fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<Budget> {
        if budget.amount <= 0.0 {
            return Err(Error::InvalidData("Budget amount must be positive".to_string()));
        }
        if let Some(t) = budget.alert_threshold {
            if t > 100 {
                return Err(Error::InvalidData(
                    "Alert threshold must be between 0 and 100".to_string(),
                ));
            }
        }
        if let (Some(s), Some(e)) = (budget.start_date, budget.end_date) {
            if e < s {
                return Err(Error::InvalidData(
                    "Budget end date cannot precede its start date".to_string(),
                ));
            }
        }

        let category = self
            .get_category(user_id, budget.category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", budget.category_id)))?;
        if category.kind != CategoryKind::Expense {
            return Err(Error::InvalidData(
                "Budgets can only be set on expense categories".to_string(),
            ));
        }

        let conn = self.conn()?;

        let duplicate: bool = conn
            .query_row(
                "SELECT 1 FROM budgets WHERE user_id = ? AND category_id = ? AND period = ?",
                params![user_id, budget.category_id, budget.period.as_str()],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if duplicate {
            return Err(Error::InvalidData(format!(
                "A {} budget already exists for this category",
                budget.period
            )));
        }

        conn.execute(
            r#"
            INSERT INTO budgets (user_id, category_id, amount, period, alert_threshold, start_date, end_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                budget.category_id,
                budget.amount,
                budget.period.as_str(),
                budget.alert_threshold.unwrap_or(80),
                budget.start_date.map(|d| d.to_string()),
                budget.end_date.map(|d| d.to_string()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
                BUDGET_COLUMNS
            ),
            params![id, user_id],
            row_to_budget,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE user_id = ? ORDER BY id",
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![user_id], row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    pub fn update_budget(
        &self,
        user_id: i64,
        id: i64,
        amount: Option<f64>,
        alert_threshold: Option<u32>,
        end_date: Option<NaiveDate>,
    ) -> Result<Budget> {
        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))?;

        if let Some(a) = amount {
            if a <= 0.0 {
                return Err(Error::InvalidData("Budget amount must be positive".to_string()));
            }
        }
        if let Some(t) = alert_threshold {
            if t > 100 {
                return Err(Error::InvalidData(
                    "Alert threshold must be between 0 and 100".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE budgets
            SET amount = COALESCE(?, amount),
                alert_threshold = COALESCE(?, alert_threshold),
                end_date = COALESCE(?, end_date)
            WHERE id = ? AND user_id = ?
            "#,
            params![
                amount,
                alert_threshold,
                end_date.map(|d| d.to_string()),
                id,
                user_id
            ],
        )?;

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }

    /// Evaluate every budget active on `today` against its current
    /// calendar period
    pub fn evaluate_budgets(&self, user_id: i64, today: NaiveDate) -> Result<Vec<BudgetStatus>> {
        let budgets = self.list_budgets(user_id)?;
        let mut statuses = Vec::with_capacity(budgets.len());

        for budget in budgets.iter().filter(|b| b.is_active_on(today)) {
            let (from, to) = period_window(budget.period, today);
            let spent =
                self.category_expense_in_range(user_id, budget.category_id, from, to)?;

            let category = self
                .get_category(user_id, budget.category_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| "Unknown".to_string());

            let percentage = (spent / budget.amount * 100.0).min(100.0).max(0.0);
            let exceeded = spent > budget.amount;

            statuses.push(BudgetStatus {
                budget_id: budget.id,
                category_id: budget.category_id,
                category,
                period: budget.period,
                amount: budget.amount,
                spent,
                percentage,
                remaining: (budget.amount - spent).max(0.0),
                exceeded,
                alert: percentage >= budget.alert_threshold as f64,
            });
        }

        Ok(statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_window_monthly() {
        let day = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let (from, to) = period_window(BudgetPeriod::Monthly, day);
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn test_period_window_weekly_starts_monday() {
        // 2026-03-05 is a Thursday
        let day = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let (from, to) = period_window(BudgetPeriod::Weekly, day);
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());

        // A Monday is its own week start
        let (from, _) = period_window(BudgetPeriod::Weekly, from);
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }
}
