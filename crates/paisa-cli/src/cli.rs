//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Paisa - Personal budget tracker
#[derive(Parser)]
#[command(name = "paisa")]
#[command(about = "Self-hosted personal budget tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing the client pages to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Extra allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Import transactions for a user from CSV
    Import {
        /// Username to import for
        #[arg(short, long)]
        user: String,

        /// CSV file with columns date,category,amount,description
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export a user's transactions as CSV
    Export {
        /// Username to export for
        #[arg(short, long)]
        user: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a demo user with sample data for local evaluation
    SeedDemo,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    Add {
        /// Username for the new account
        username: String,

        /// Day of month income recurs (1-31)
        #[arg(long, default_value = "1")]
        allowance_day: u32,

        /// Password; prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}
