//! Category operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, NewCategory, TransactionType};

/// Map a `id, name, type, created_at` row
fn category_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Category> {
    let type_str: String = row.get(offset + 2)?;
    let created_at_str: String = row.get(offset + 3)?;

    Ok(Category {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        category_type: type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 2,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?,
        created_at: parse_datetime(&created_at_str),
    })
}

pub(super) fn optional_category_from_row(
    row: &Row<'_>,
    offset: usize,
) -> rusqlite::Result<Option<Category>> {
    let id: Option<i64> = row.get(offset)?;
    match id {
        Some(_) => category_from_row(row, offset).map(Some),
        None => Ok(None),
    }
}

impl Database {
    /// Create a category; names are unique
    pub fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Category name must not be empty".into()));
        }

        let conn = self.conn()?;

        // Uniqueness is enforced by the index, not a prior lookup
        conn.execute(
            "INSERT INTO categories (name, type) VALUES (?, ?)",
            params![name, category.category_type.as_str()],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::InvalidData(format!("Category already exists: {}", name))
            }
            other => other.into(),
        })?;

        let id = conn.last_insert_rowid();
        self.get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", id)))
    }

    /// List all categories by name
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, type, created_at FROM categories ORDER BY name")?;

        let categories = stmt
            .query_map([], |row| category_from_row(row, 0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// List categories of one type
    pub fn list_categories_by_type(&self, category_type: TransactionType) -> Result<Vec<Category>> {
        Ok(self
            .list_categories()?
            .into_iter()
            .filter(|c| c.category_type == category_type)
            .collect())
    }

    /// Get a category by ID
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, type, created_at FROM categories WHERE id = ?",
                params![id],
                |row| category_from_row(row, 0),
            )
            .optional()?;

        Ok(category)
    }
}
