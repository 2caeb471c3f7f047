//! Aggregation queries feeding the dashboard and the insight generator

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{CategoryAmount, CategoryKind, MonthlyTrendPoint, Transaction};

/// First day of the month containing `date`
pub(crate) fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 always valid")
}

/// Last day of the month containing `date`
pub(crate) fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date) + Months::new(1) - chrono::Duration::days(1)
}

impl Database {
    /// Sum of transaction amounts for categories of a kind within
    /// `[from, to]` inclusive. Zero when there are no rows.
    fn sum_by_kind(
        &self,
        user_id: i64,
        kind: CategoryKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(t.amount), 0)
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ?1 AND c.kind = ?2
              AND t.transaction_date BETWEEN ?3 AND ?4
            "#,
            params![user_id, kind.as_str(), from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Total income for a user within `[from, to]` inclusive
    pub fn total_income(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        self.sum_by_kind(user_id, CategoryKind::Income, from, to)
    }

    /// Total expense for a user within `[from, to]` inclusive
    pub fn total_expense(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        self.sum_by_kind(user_id, CategoryKind::Expense, from, to)
    }

    /// Expense totals grouped by category, descending - the expense
    /// breakdown chart payload. Empty when there are no expenses in range.
    pub fn expense_by_category(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CategoryAmount>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.name, c.color, SUM(t.amount) AS total, COUNT(t.id)
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ?1 AND c.kind = 'expense'
              AND t.transaction_date BETWEEN ?2 AND ?3
            GROUP BY c.id, c.name, c.color
            ORDER BY total DESC
            "#,
        )?;

        let rows = stmt.query_map(
            params![user_id, from.to_string(), to.to_string()],
            |row| {
                Ok(CategoryAmount {
                    category_id: row.get(0)?,
                    category: row.get(1)?,
                    color: row.get(2)?,
                    total: row.get(3)?,
                    transaction_count: row.get(4)?,
                })
            },
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Expense total for one category within `[from, to]` inclusive
    pub fn category_expense_in_range(
        &self,
        user_id: i64,
        category_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(t.amount), 0)
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ?1 AND t.category_id = ?2 AND c.kind = 'expense'
              AND t.transaction_date BETWEEN ?3 AND ?4
            "#,
            params![user_id, category_id, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Count of expense transactions below `below` currency units in range
    pub fn count_small_expenses(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        below: f64,
    ) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ?1 AND c.kind = 'expense' AND t.amount < ?2
              AND t.transaction_date BETWEEN ?3 AND ?4
            "#,
            params![user_id, below, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Income/expense totals for the last `months` calendar months up to
    /// `today`, oldest first, zero-filled for months without transactions.
    /// The dashboard trend chart uses six.
    pub fn monthly_trend(
        &self,
        user_id: i64,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<MonthlyTrendPoint>> {
        let months = months.max(1);
        let first = month_start(today) - Months::new(months - 1);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT strftime('%Y-%m', t.transaction_date) AS ym,
                   SUM(CASE WHEN c.kind = 'income' THEN t.amount ELSE 0 END),
                   SUM(CASE WHEN c.kind = 'expense' THEN t.amount ELSE 0 END)
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ?1 AND t.transaction_date BETWEEN ?2 AND ?3
            GROUP BY ym
            "#,
        )?;

        let totals: HashMap<String, (f64, f64)> = stmt
            .query_map(
                params![user_id, first.to_string(), today.to_string()],
                |row| Ok((row.get::<_, String>(0)?, (row.get(1)?, row.get(2)?))),
            )?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;

        let mut trend = Vec::with_capacity(months as usize);
        for i in 0..months {
            let month = first + Months::new(i);
            let label = month.format("%Y-%m").to_string();
            let (income, expense) = totals.get(&label).copied().unwrap_or((0.0, 0.0));
            trend.push(MonthlyTrendPoint {
                month: label,
                income,
                expense,
            });
        }

        Ok(trend)
    }

    /// Most recent transactions for the dashboard list
    pub fn recent_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        self.list_transactions(user_id, None, None, None, limit, 0)
    }
}
