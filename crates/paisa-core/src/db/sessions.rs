//! Server-side session tokens

use chrono::{Duration, Utc};
use rand::RngCore;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::User;

/// SQLite datetime format, kept comparable with CURRENT_TIMESTAMP
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

impl Database {
    /// Create a session for a user, returning the opaque token
    pub fn create_session(&self, user_id: i64, ttl_days: i64) -> Result<String> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let expires_at = (Utc::now() + Duration::days(ttl_days))
            .format(SQLITE_DATETIME)
            .to_string();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (user_id, token, expires_at) VALUES (?, ?, ?)",
            params![user_id, token, expires_at],
        )?;

        Ok(token)
    }

    /// Resolve a session token to its user, ignoring expired sessions
    pub fn user_for_session(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;

        // Opportunistic cleanup; no background workers in this app
        conn.execute(
            "DELETE FROM sessions WHERE expires_at <= CURRENT_TIMESTAMP",
            [],
        )?;

        let user = conn
            .query_row(
                r#"
                SELECT u.id, u.username, u.allowance_day, u.created_at
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token = ? AND s.expires_at > CURRENT_TIMESTAMP
                "#,
                params![token],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        allowance_day: row.get::<_, i64>(2)? as u32,
                        created_at: parse_datetime(&row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Delete a session (logout). Deleting an unknown token is not an error.
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM sessions WHERE token = ?", params![token])?;
        Ok(())
    }
}
