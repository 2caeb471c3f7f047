//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - User accounts and credential verification
//! - `sessions` - Server-side session tokens
//! - `categories` - Global and user-owned transaction categories
//! - `transactions` - Transaction CRUD
//! - `budgets` - Category budgets and the budget evaluator
//! - `goals` - Savings goals, progress, and the quick-save operation
//! - `insights` - Persisted spending insights
//! - `reports` - Aggregation queries feeding the dashboard

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

use crate::error::Result;
use crate::models::CategoryKind;

mod budgets;
mod categories;
mod goals;
mod insights;
mod reports;
mod sessions;
mod transactions;
mod users;

pub use budgets::NewBudget;
pub use goals::NewGoal;
pub(crate) use reports::{month_end, month_start};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool, running migrations and
    /// seeding the global categories
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        db.seed_global_categories()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because each
    /// pooled connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/paisa_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Users
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                allowance_day INTEGER NOT NULL DEFAULT 1,   -- day of month income recurs
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Sessions (server-side login tokens)
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                token TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                expires_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);

            -- Categories (user_id NULL = global/built-in)
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                user_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                color TEXT,
                icon TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, name, kind)
            );

            CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id);
            CREATE INDEX IF NOT EXISTS idx_categories_kind ON categories(kind);

            -- Transactions (amount always positive; category kind gives it a sign)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL DEFAULT '',
                transaction_date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, transaction_date);
            CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);

            -- Budgets
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                amount REAL NOT NULL CHECK (amount > 0),
                period TEXT NOT NULL DEFAULT 'monthly' CHECK (period IN ('weekly', 'monthly')),
                alert_threshold INTEGER NOT NULL DEFAULT 80,
                start_date DATE,                            -- NULL = no lower bound
                end_date DATE,                              -- NULL = no upper bound
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, category_id, period)
            );

            CREATE INDEX IF NOT EXISTS idx_budgets_user ON budgets(user_id);

            -- Goals
            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL CHECK (target_amount > 0),
                current_amount REAL NOT NULL DEFAULT 0,
                start_date DATE NOT NULL,
                end_date DATE NOT NULL,
                priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id);

            -- Insights (persisted cache of generated insight texts)
            CREATE TABLE IF NOT EXISTS insights (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                insight_text TEXT NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_insights_user_read ON insights(user_id, is_read);

            -- Quick-saves (audit trail of goal contributions)
            CREATE TABLE IF NOT EXISTS quick_saves (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                goal_id INTEGER NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
                amount REAL NOT NULL CHECK (amount > 0),
                save_date DATE NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_quick_saves_goal ON quick_saves(goal_id);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }

    /// Seed the built-in global categories (idempotent)
    fn seed_global_categories(&self) -> Result<()> {
        let conn = self.conn()?;

        let globals: &[(&str, CategoryKind, &str, &str)] = &[
            ("Salary", CategoryKind::Income, "#22c55e", "banknote"),
            ("Pocket Money", CategoryKind::Income, "#10b981", "wallet"),
            ("Other Income", CategoryKind::Income, "#84cc16", "plus-circle"),
            ("Food", CategoryKind::Expense, "#f59e0b", "utensils"),
            ("Coffee", CategoryKind::Expense, "#a16207", "coffee"),
            ("Dining Out", CategoryKind::Expense, "#f97316", "pizza"),
            ("Entertainment", CategoryKind::Expense, "#a855f7", "film"),
            ("Shopping", CategoryKind::Expense, "#14b8a6", "shopping-bag"),
            ("Transport", CategoryKind::Expense, "#ef4444", "bus"),
            ("Rent", CategoryKind::Expense, "#6366f1", "home"),
            ("Utilities", CategoryKind::Expense, "#8b5cf6", "zap"),
            ("Education", CategoryKind::Expense, "#0ea5e9", "book"),
            ("Savings", CategoryKind::Expense, "#64748b", "piggy-bank"),
            ("Other", CategoryKind::Expense, "#9ca3af", "circle"),
        ];

        for (name, kind, color, icon) in globals {
            // NULL user_id needs an explicit existence check; the UNIQUE
            // constraint does not fire across NULLs in SQLite
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM categories WHERE user_id IS NULL AND name = ? AND kind = ?",
                    params![name, kind.as_str()],
                    |_| Ok(true),
                )
                .unwrap_or(false);

            if !exists {
                conn.execute(
                    "INSERT INTO categories (user_id, name, kind, color, icon) VALUES (NULL, ?, ?, ?, ?)",
                    params![name, kind.as_str(), color, icon],
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
