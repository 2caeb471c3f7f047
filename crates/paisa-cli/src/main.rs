//! Paisa CLI - Personal budget tracker
//!
//! Usage:
//!   paisa init                     Initialize database
//!   paisa user add NAME            Create a user account
//!   paisa serve --port 3000        Start the web server
//!   paisa import --user NAME --file FILE   Import transactions from CSV
//!   paisa export --user NAME       Export transactions as CSV

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

/// Default database location: the platform data directory, falling back to
/// the working directory
fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("paisa").join("paisa.db"),
        None => PathBuf::from("paisa.db"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = cli.db.unwrap_or_else(default_db_path);

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Serve {
            port,
            host,
            static_dir,
            allow_origins,
        } => {
            commands::cmd_serve(&db_path, &host, port, static_dir.as_deref(), allow_origins).await
        }
        Commands::User { command } => match command {
            UserCommands::Add {
                username,
                allowance_day,
                password,
            } => commands::cmd_user_add(&db_path, &username, allowance_day, password.as_deref()),
        },
        Commands::Import { user, file } => commands::cmd_import(&db_path, &user, &file),
        Commands::Export {
            user,
            from,
            to,
            output,
        } => commands::cmd_export(&db_path, &user, from.as_deref(), to.as_deref(), output.as_deref()),
        Commands::SeedDemo => commands::cmd_seed_demo(&db_path),
    }
}
