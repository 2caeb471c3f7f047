//! Command implementations

mod demo;
mod init;
mod serve;
mod transfer;
mod users;

pub use demo::cmd_seed_demo;
pub use init::cmd_init;
pub use serve::cmd_serve;
pub use transfer::{cmd_export, cmd_import};
pub use users::cmd_user_add;

use std::path::Path;

use anyhow::{Context, Result};
use paisa_core::db::Database;

/// Open (creating if needed) the database at `path`
pub(crate) fn open_database(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db = Database::new(&path.to_string_lossy())
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    Ok(db)
}

/// Look up a user by name or bail with a hint
pub(crate) fn require_user(db: &Database, username: &str) -> Result<paisa_core::models::User> {
    db.get_user_by_username(username)?
        .with_context(|| format!("No user named '{}'. Create one with: paisa user add {}", username, username))
}
