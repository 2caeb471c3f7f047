//! Category operations
//!
//! Categories are either global (seeded, user_id NULL) or owned by a single
//! user. A user sees the union of both.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, CategoryKind};
use crate::sanitize::clean_text;

fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    let kind: String = row.get(3)?;
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        kind: kind.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
        })?,
        color: row.get(4)?,
        icon: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

const CATEGORY_COLUMNS: &str = "id, user_id, name, kind, color, icon, created_at";

impl Database {
    /// List the categories visible to a user (global plus their own)
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE user_id IS NULL OR user_id = ? ORDER BY kind, name",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map(params![user_id], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category if it is visible to the user
    pub fn get_category(&self, user_id: i64, category_id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM categories WHERE id = ? AND (user_id IS NULL OR user_id = ?)",
                CATEGORY_COLUMNS
            ),
            params![category_id, user_id],
            row_to_category,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Find a visible category by name (case-insensitive), preferring an
    /// exact user-owned match over a global one
    pub fn find_category_by_name(
        &self,
        user_id: i64,
        name: &str,
        kind: Option<CategoryKind>,
    ) -> Result<Option<Category>> {
        let conn = self.conn()?;

        let (kind_clause, kind_param) = match kind {
            Some(k) => ("AND kind = ?3", Some(k.as_str())),
            None => ("", None),
        };

        let sql = format!(
            r#"
            SELECT {} FROM categories
            WHERE name = ?1 COLLATE NOCASE
              AND (user_id IS NULL OR user_id = ?2)
              {}
            ORDER BY user_id IS NULL
            LIMIT 1
            "#,
            CATEGORY_COLUMNS, kind_clause
        );

        let found = match kind_param {
            Some(k) => conn
                .query_row(&sql, params![name.trim(), user_id, k], row_to_category)
                .optional()?,
            None => conn
                .query_row(&sql, params![name.trim(), user_id], row_to_category)
                .optional()?,
        };

        Ok(found)
    }

    /// Create a user-owned category
    pub fn create_category(
        &self,
        user_id: i64,
        name: &str,
        kind: CategoryKind,
        color: Option<&str>,
        icon: Option<&str>,
    ) -> Result<Category> {
        let name = clean_text(name);
        if name.is_empty() {
            return Err(Error::InvalidData("Category name cannot be empty".to_string()));
        }

        if self.find_category_by_name(user_id, &name, Some(kind))?.is_some() {
            return Err(Error::InvalidData(format!(
                "A {} category named '{}' already exists",
                kind, name
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (user_id, name, kind, color, icon) VALUES (?, ?, ?, ?, ?)",
            params![user_id, name, kind.as_str(), color, icon],
        )?;

        let id = conn.last_insert_rowid();
        self.get_category(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", id)))
    }

    /// Update a user-owned category (global categories are read-only)
    pub fn update_category(
        &self,
        user_id: i64,
        category_id: i64,
        name: Option<&str>,
        color: Option<&str>,
        icon: Option<&str>,
    ) -> Result<Category> {
        let existing = self
            .get_category(user_id, category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", category_id)))?;
        if existing.user_id.is_none() {
            return Err(Error::InvalidData(
                "Built-in categories cannot be edited".to_string(),
            ));
        }

        let new_name = match name {
            Some(n) => {
                let n = clean_text(n);
                if n.is_empty() {
                    return Err(Error::InvalidData("Category name cannot be empty".to_string()));
                }
                n
            }
            None => existing.name.clone(),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE categories SET name = ?, color = COALESCE(?, color), icon = COALESCE(?, icon) WHERE id = ? AND user_id = ?",
            params![new_name, color, icon, category_id, user_id],
        )?;

        self.get_category(user_id, category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", category_id)))
    }

    /// Delete a user-owned category. Refuses when transactions or budgets
    /// still reference it.
    pub fn delete_category(&self, user_id: i64, category_id: i64) -> Result<()> {
        let existing = self
            .get_category(user_id, category_id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", category_id)))?;
        if existing.user_id.is_none() {
            return Err(Error::InvalidData(
                "Built-in categories cannot be deleted".to_string(),
            ));
        }

        let conn = self.conn()?;

        let in_use: bool = conn
            .query_row(
                r#"
                SELECT 1 FROM transactions WHERE category_id = ?1
                UNION SELECT 1 FROM budgets WHERE category_id = ?1
                LIMIT 1
                "#,
                params![category_id],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if in_use {
            return Err(Error::InvalidData(
                "Category is still used by transactions or budgets".to_string(),
            ));
        }

        conn.execute(
            "DELETE FROM categories WHERE id = ? AND user_id = ?",
            params![category_id, user_id],
        )?;
        Ok(())
    }
}
