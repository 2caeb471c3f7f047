//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};
use crate::sanitize::clean_text;

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let kind: String = row.get(4)?;
    let date: String = row.get(6)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        category: row.get(3)?,
        kind: kind.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?,
        amount: row.get(5)?,
        description: row.get(7)?,
        transaction_date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

const TX_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.category_id, c.name, c.kind, t.amount,
           t.transaction_date, t.description, t.created_at
    FROM transactions t
    JOIN categories c ON c.id = t.category_id
"#;

impl Database {
    /// Insert a transaction for a user
    pub fn add_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        if tx.amount <= 0.0 {
            return Err(Error::InvalidData("Amount must be positive".to_string()));
        }

        // The category must be visible to this user
        self.get_category(user_id, tx.category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", tx.category_id)))?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, category_id, amount, description, transaction_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.category_id,
                tx.amount,
                clean_text(&tx.description),
                tx.transaction_date.to_string(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("{} WHERE t.id = ? AND t.user_id = ?", TX_SELECT),
            params![id, user_id],
            row_to_transaction,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List a user's transactions with optional filters, newest first
    pub fn list_transactions(
        &self,
        user_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        category_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        // Build dynamic WHERE clause
        let mut conditions = vec!["t.user_id = ?".to_string()];
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(from) = from {
            conditions.push("t.transaction_date >= ?".to_string());
            params_vec.push(Box::new(from.to_string()));
        }
        if let Some(to) = to {
            conditions.push("t.transaction_date <= ?".to_string());
            params_vec.push(Box::new(to.to_string()));
        }
        if let Some(cid) = category_id {
            conditions.push("t.category_id = ?".to_string());
            params_vec.push(Box::new(cid));
        }

        let sql = format!(
            "{} WHERE {} ORDER BY t.transaction_date DESC, t.id DESC LIMIT ? OFFSET ?",
            TX_SELECT,
            conditions.join(" AND ")
        );
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let transactions = stmt
            .query_map(param_refs.as_slice(), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Edit a transaction. This is the only path that changes an already
    /// recorded amount.
    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        tx: &NewTransaction,
    ) -> Result<Transaction> {
        if tx.amount <= 0.0 {
            return Err(Error::InvalidData("Amount must be positive".to_string()));
        }
        self.get_category(user_id, tx.category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", tx.category_id)))?;

        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET category_id = ?, amount = ?, description = ?, transaction_date = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                tx.category_id,
                tx.amount,
                clean_text(&tx.description),
                tx.transaction_date.to_string(),
                id,
                user_id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }

        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }
}
