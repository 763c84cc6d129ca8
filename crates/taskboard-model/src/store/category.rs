//! Category persistence.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::update_row;
use crate::error::StoreResult;
use crate::models::{Category, NewCategory};
use crate::values::Changes;

const CATEGORY_SELECT_SQL: &str =
    "SELECT id, name, project_id, description, color_id FROM project_has_categories";

const UPDATABLE: &[&str] = &["name", "description", "color_id"];

/// Persistence contract for task categories.
pub trait CategoryStore {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Category>>;
    /// Returns the project's categories ordered by name.
    fn get_all(&self, project_id: i64) -> StoreResult<Vec<Category>>;
    /// Returns `(id, name)` pairs ordered by name.
    fn get_list(&self, project_id: i64) -> StoreResult<Vec<(i64, String)>>;
    fn get_by_name(&self, project_id: i64, name: &str) -> StoreResult<Option<Category>>;
    fn create(&self, category: &NewCategory) -> StoreResult<i64>;
    fn update(&self, id: i64, changes: &Changes) -> StoreResult<bool>;
    /// Removes the category and detaches it from every task.
    fn remove(&self, id: i64) -> StoreResult<bool>;
}

/// SQLite-backed category store.
pub struct SqliteCategoryStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryStore for SqliteCategoryStore<'_> {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Category>> {
        let category = self
            .conn
            .query_row(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1"), [id], parse_row)
            .optional()?;
        Ok(category)
    }

    fn get_all(&self, project_id: i64) -> StoreResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} WHERE project_id = ?1 ORDER BY name COLLATE NOCASE"
        ))?;
        let rows = stmt.query_map([project_id], parse_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_list(&self, project_id: i64) -> StoreResult<Vec<(i64, String)>> {
        Ok(self
            .get_all(project_id)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    }

    fn get_by_name(&self, project_id: i64, name: &str) -> StoreResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE project_id = ?1 AND name = ?2"),
                params![project_id, name],
                parse_row,
            )
            .optional()?;
        Ok(category)
    }

    fn create(&self, category: &NewCategory) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO project_has_categories (name, project_id, description, color_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                category.name.trim(),
                category.project_id,
                category.description.as_str(),
                category.color_id.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: i64, changes: &Changes) -> StoreResult<bool> {
        update_row(self.conn, "project_has_categories", UPDATABLE, id, changes)
    }

    fn remove(&self, id: i64) -> StoreResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("UPDATE tasks SET category_id = 0 WHERE category_id = ?1", [id])?;
        let removed = tx.execute("DELETE FROM project_has_categories WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

fn parse_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        project_id: row.get(2)?,
        description: row.get(3)?,
        color_id: row.get(4)?,
    })
}
