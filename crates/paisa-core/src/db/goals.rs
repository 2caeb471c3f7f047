//! Savings goals, progress, and the quick-save operation

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CategoryKind, Goal, GoalProgress, QuickSave, QuickSaveOutcome};
use crate::sanitize::clean_text;

/// A new goal before DB insertion
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: crate::models::GoalPriority,
}

fn row_to_goal(row: &Row) -> rusqlite::Result<Goal> {
    let parse_date = |idx: usize, s: String| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    };
    let priority: String = row.get(7)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        start_date: parse_date(5, row.get(5)?)?,
        end_date: parse_date(6, row.get(6)?)?,
        priority: priority.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, e.into())
        })?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

const GOAL_COLUMNS: &str =
    "id, user_id, name, target_amount, current_amount, start_date, end_date, priority, created_at";

impl Database {
    pub fn create_goal(&self, user_id: i64, goal: &NewGoal) -> Result<Goal> {
        let name = clean_text(&goal.name);
        if name.is_empty() {
            return Err(Error::InvalidData("Goal name cannot be empty".to_string()));
        }
        if goal.target_amount <= 0.0 {
            return Err(Error::InvalidData("Target amount must be positive".to_string()));
        }
        if goal.end_date <= goal.start_date {
            return Err(Error::InvalidData(
                "Goal end date must come after its start date".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, name, target_amount, start_date, end_date, priority)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                name,
                goal.target_amount,
                goal.start_date.to_string(),
                goal.end_date.to_string(),
                goal.priority.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))
    }

    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM goals WHERE id = ? AND user_id = ?", GOAL_COLUMNS),
            params![id, user_id],
            row_to_goal,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List a user's goals, highest priority first, nearest deadline first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM goals WHERE user_id = ?
            ORDER BY CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
                     end_date
            "#,
            GOAL_COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![user_id], row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Goals whose deadline has not passed as of `today`
    pub fn goals_active_for(&self, user_id: i64, today: NaiveDate) -> Result<Vec<Goal>> {
        Ok(self
            .list_goals(user_id)?
            .into_iter()
            .filter(|g| g.end_date >= today)
            .collect())
    }

    /// Progress of every goal of the user as of `today`
    pub fn goal_progress_all(&self, user_id: i64, today: NaiveDate) -> Result<Vec<GoalProgress>> {
        Ok(self
            .list_goals(user_id)?
            .iter()
            .map(|g| g.progress(today))
            .collect())
    }

    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        Ok(())
    }

    /// List the quick-save audit records for a goal
    pub fn list_quick_saves(&self, user_id: i64, goal_id: i64) -> Result<Vec<QuickSave>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, goal_id, amount, save_date, created_at
            FROM quick_saves
            WHERE user_id = ? AND goal_id = ?
            ORDER BY id DESC
            "#,
        )?;

        let saves = stmt
            .query_map(params![user_id, goal_id], |row| {
                let date: String = row.get(4)?;
                Ok(QuickSave {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    goal_id: row.get(2)?,
                    amount: row.get(3)?,
                    save_date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    created_at: parse_datetime(&row.get::<_, String>(5)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(saves)
    }

    /// Record a one-off contribution toward a goal
    ///
    /// Three effects commit together or not at all: the goal increment, the
    /// quick-save audit row, and a mirrored "Savings" transaction dated
    /// `today`. The goal amount only ever increases through this path.
    pub fn quick_save(
        &self,
        user_id: i64,
        goal_id: i64,
        amount: f64,
        today: NaiveDate,
    ) -> Result<QuickSaveOutcome> {
        if amount <= 0.0 {
            return Err(Error::QuickSave("Amount must be positive".to_string()));
        }

        let savings_category = self
            .find_category_by_name(user_id, "Savings", Some(CategoryKind::Expense))?
            .ok_or_else(|| Error::QuickSave("No Savings category available".to_string()))?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let goal: Option<(String, f64, f64)> = tx
            .query_row(
                "SELECT name, current_amount, target_amount FROM goals WHERE id = ? AND user_id = ?",
                params![goal_id, user_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((goal_name, previous, target_amount)) = goal else {
            // Dropping the transaction rolls it back
            return Err(Error::QuickSave("Goal not found".to_string()));
        };

        tx.execute(
            "UPDATE goals SET current_amount = current_amount + ? WHERE id = ?",
            params![amount, goal_id],
        )?;

        tx.execute(
            "INSERT INTO quick_saves (user_id, goal_id, amount, save_date) VALUES (?, ?, ?, ?)",
            params![user_id, goal_id, amount, today.to_string()],
        )?;

        tx.execute(
            r#"
            INSERT INTO transactions (user_id, category_id, amount, description, transaction_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                savings_category.id,
                amount,
                format!("Saved towards {}", goal_name),
                today.to_string(),
            ],
        )?;

        tx.commit()?;

        let new_amount = previous + amount;
        Ok(QuickSaveOutcome {
            goal_id,
            goal_name,
            new_amount,
            target_amount,
            goal_reached: previous < target_amount && new_amount >= target_amount,
        })
    }
}
