//! User management commands

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};

use super::open_database;

pub fn cmd_user_add(
    db_path: &Path,
    username: &str,
    allowance_day: u32,
    password: Option<&str>,
) -> Result<()> {
    let db = open_database(db_path)?;

    let password = match password {
        Some(p) => p.to_string(),
        None => prompt_password()?,
    };

    let user = db.create_user(username, &password, allowance_day)?;
    println!(
        "Created user '{}' (allowance day {})",
        user.username, user.allowance_day
    );
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Password (min 8 chars): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}
