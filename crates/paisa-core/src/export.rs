//! Transaction export
//!
//! Produces the tabular data behind the CSV download; the printable/PDF
//! rendering of the dashboard is assembled client-side from the same
//! dashboard payload.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::error::Result;

/// Options for transaction export
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Start date filter (inclusive)
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub to: Option<NaiveDate>,
}

/// One exported transaction row
#[derive(Debug, Clone, Serialize)]
pub struct TransactionExport {
    pub date: String,
    pub category: String,
    pub kind: String,
    pub amount: f64,
    pub description: String,
}

impl Database {
    /// Export a user's transactions with optional date filtering
    pub fn export_transactions(
        &self,
        user_id: i64,
        opts: &ExportOptions,
    ) -> Result<Vec<TransactionExport>> {
        let transactions =
            self.list_transactions(user_id, opts.from, opts.to, None, i64::MAX, 0)?;

        Ok(transactions
            .into_iter()
            .map(|tx| TransactionExport {
                date: tx.transaction_date.to_string(),
                category: tx.category,
                kind: tx.kind.to_string(),
                amount: tx.amount,
                description: tx.description,
            })
            .collect())
    }

    /// Export a user's transactions to CSV
    pub fn export_transactions_csv(&self, user_id: i64, opts: &ExportOptions) -> Result<String> {
        let rows = self.export_transactions(user_id, opts)?;

        let mut csv = String::from("date,category,kind,amount,description\n");
        for row in rows {
            csv.push_str(&format!(
                "{},{},{},{:.2},{}\n",
                row.date,
                escape_csv_field(&row.category),
                row.kind,
                row.amount,
                escape_csv_field(&row.description)
            ));
        }

        Ok(csv)
    }
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
