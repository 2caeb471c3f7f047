//! CSV import and export commands

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use paisa_core::export::ExportOptions;

use super::{open_database, require_user};

pub fn cmd_import(db_path: &Path, username: &str, file: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let user = require_user(&db, username)?;

    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let summary = db.import_transactions_csv(user.id, reader)?;

    println!(
        "Imported {} transactions, skipped {}",
        summary.imported, summary.skipped
    );
    for error in &summary.errors {
        eprintln!("  {}", error);
    }
    Ok(())
}

pub fn cmd_export(
    db_path: &Path,
    username: &str,
    from: Option<&str>,
    to: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let db = open_database(db_path)?;
    let user = require_user(&db, username)?;

    let parse = |value: Option<&str>, name: &str| -> Result<Option<NaiveDate>> {
        value
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .with_context(|| format!("Invalid --{} date (use YYYY-MM-DD)", name))
    };

    let opts = ExportOptions {
        from: parse(from, "from")?,
        to: parse(to, "to")?,
    };

    let csv = db.export_transactions_csv(user.id, &opts)?;
    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Wrote {} rows to {}",
                csv.lines().count().saturating_sub(1),
                path.display()
            );
        }
        None => print!("{}", csv),
    }
    Ok(())
}
