//! Bulk transaction import from CSV
//!
//! Expected columns: `date,category,amount,description` with an ISO date
//! and a category name visible to the importing user. Bad rows are
//! reported, good rows are inserted; one malformed line does not sink the
//! rest of the file.

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::Result;
use crate::models::NewTransaction;

/// One raw CSV row as parsed by serde
#[derive(Debug, Deserialize)]
struct ImportRow {
    date: String,
    category: String,
    amount: f64,
    #[serde(default)]
    description: String,
}

/// Outcome of one import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    /// Human-readable reason per skipped row
    pub errors: Vec<String>,
}

impl Database {
    /// Import transactions for a user from CSV data
    pub fn import_transactions_csv<R: Read>(
        &self,
        user_id: i64,
        reader: R,
    ) -> Result<ImportSummary> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut summary = ImportSummary {
            imported: 0,
            skipped: 0,
            errors: Vec::new(),
        };

        for (index, record) in csv_reader.deserialize::<ImportRow>().enumerate() {
            // CSV line number for humans: header is line 1
            let line = index + 2;

            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    summary.skipped += 1;
                    summary.errors.push(format!("line {}: {}", line, e));
                    continue;
                }
            };

            let date = match NaiveDate::parse_from_str(&row.date, "%Y-%m-%d") {
                Ok(d) => d,
                Err(_) => {
                    summary.skipped += 1;
                    summary
                        .errors
                        .push(format!("line {}: invalid date '{}' (use YYYY-MM-DD)", line, row.date));
                    continue;
                }
            };

            let category = match self.find_category_by_name(user_id, &row.category, None)? {
                Some(c) => c,
                None => {
                    summary.skipped += 1;
                    summary
                        .errors
                        .push(format!("line {}: unknown category '{}'", line, row.category));
                    continue;
                }
            };

            let insert = self.add_transaction(
                user_id,
                &NewTransaction {
                    category_id: category.id,
                    amount: row.amount,
                    description: row.description,
                    transaction_date: date,
                },
            );

            match insert {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    summary.skipped += 1;
                    summary.errors.push(format!("line {}: {}", line, e));
                }
            }
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Transaction import finished"
        );
        Ok(summary)
    }
}
