//! Persisted spending insights
//!
//! Generated insight texts are appended here so the dashboard can show
//! history. Identical texts are intentionally not de-duplicated; a repeat
//! firing is a repeat observation.

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Insight;

impl Database {
    /// Append a generated insight for a user
    pub fn add_insight(&self, user_id: i64, text: &str) -> Result<Insight> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO insights (user_id, insight_text) VALUES (?, ?)",
            params![user_id, text],
        )?;
        let id = conn.last_insert_rowid();

        conn.query_row(
            "SELECT id, user_id, insight_text, is_read, created_at FROM insights WHERE id = ?",
            params![id],
            |row| {
                Ok(Insight {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    insight_text: row.get(2)?,
                    is_read: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            },
        )
        .map_err(Into::into)
    }

    /// List a user's insights, newest first. `unread_only` filters to the
    /// ones not yet seen.
    pub fn list_insights(&self, user_id: i64, unread_only: bool, limit: i64) -> Result<Vec<Insight>> {
        let conn = self.conn()?;
        let sql = if unread_only {
            "SELECT id, user_id, insight_text, is_read, created_at FROM insights
             WHERE user_id = ? AND is_read = 0 ORDER BY id DESC LIMIT ?"
        } else {
            "SELECT id, user_id, insight_text, is_read, created_at FROM insights
             WHERE user_id = ? ORDER BY id DESC LIMIT ?"
        };

        let mut stmt = conn.prepare(sql)?;
        let insights = stmt
            .query_map(params![user_id, limit], |row| {
                Ok(Insight {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    insight_text: row.get(2)?,
                    is_read: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(insights)
    }

    /// Mark one insight as read
    pub fn mark_insight_read(&self, user_id: i64, insight_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE insights SET is_read = 1 WHERE id = ? AND user_id = ?",
            params![insight_id, user_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Insight {}", insight_id)));
        }
        Ok(())
    }

    /// Count of unread insights for the badge in the UI
    pub fn count_unread_insights(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM insights WHERE user_id = ? AND is_read = 0",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
