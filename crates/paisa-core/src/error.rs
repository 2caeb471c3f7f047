//! Error types for Paisa

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Quick-save failed: {0}")]
    QuickSave(String),

    #[error("Import error: {0}")]
    Import(String),
}

pub type Result<T> = std::result::Result<T, Error>;
