//! Database initialization command

use std::path::Path;

use anyhow::Result;

use super::open_database;

pub fn cmd_init(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    println!("Database ready at {}", db.path());
    Ok(())
}
