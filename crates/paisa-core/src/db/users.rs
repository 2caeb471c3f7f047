//! User accounts and credential verification

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;
use crate::sanitize::clean_text;

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        allowance_day: row.get::<_, i64>(2)? as u32,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

impl Database {
    /// Create a user with an Argon2id password hash
    pub fn create_user(&self, username: &str, password: &str, allowance_day: u32) -> Result<User> {
        let username = clean_text(username);
        if username.is_empty() {
            return Err(Error::InvalidData("Username cannot be empty".to_string()));
        }
        if password.len() < 8 {
            return Err(Error::InvalidData(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if !(1..=31).contains(&allowance_day) {
            return Err(Error::InvalidData(
                "Allowance day must be between 1 and 31".to_string(),
            ));
        }

        let conn = self.conn()?;

        let taken: bool = conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?",
                params![username],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if taken {
            return Err(Error::UsernameTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?
            .to_string();

        conn.execute(
            "INSERT INTO users (username, password_hash, allowance_day) VALUES (?, ?, ?)",
            params![username, hash, allowance_day],
        )?;

        let id = conn.last_insert_rowid();
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, username, allowance_day, created_at FROM users WHERE id = ?",
            params![id],
            row_to_user,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, username, allowance_day, created_at FROM users WHERE username = ?",
            params![username.trim()],
            row_to_user,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Verify a username/password pair
    ///
    /// Returns the same `InvalidCredentials` error whether the user does not
    /// exist or the password is wrong, so callers cannot enumerate usernames.
    pub fn verify_credentials(&self, username: &str, password: &str) -> Result<User> {
        let conn = self.conn()?;

        let stored: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?",
                params![username.trim()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((id, hash)) = stored else {
            return Err(Error::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(Error::InvalidCredentials);
        }

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Change the day of month the user's recurring income lands
    pub fn update_allowance_day(&self, user_id: i64, allowance_day: u32) -> Result<()> {
        if !(1..=31).contains(&allowance_day) {
            return Err(Error::InvalidData(
                "Allowance day must be between 1 and 31".to_string(),
            ));
        }
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE users SET allowance_day = ? WHERE id = ?",
            params![allowance_day, user_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }
        Ok(())
    }
}
