//! Column and swimlane persistence.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreResult;
use crate::models::{Column, Swimlane, DEFAULT_COLUMNS, DEFAULT_SWIMLANE};

/// Persistence contract for board columns and swimlanes.
pub trait BoardStore {
    /// Returns the project's columns ordered by position.
    fn columns(&self, project_id: i64) -> StoreResult<Vec<Column>>;
    fn first_column_id(&self, project_id: i64) -> StoreResult<Option<i64>>;
    /// Returns the project's swimlanes ordered by position.
    fn swimlanes(&self, project_id: i64, active_only: bool) -> StoreResult<Vec<Swimlane>>;
    fn first_swimlane_id(&self, project_id: i64) -> StoreResult<Option<i64>>;
    /// Creates the default columns and swimlane of a new project.
    fn create_defaults(&self, project_id: i64) -> StoreResult<()>;
}

/// SQLite-backed board store.
pub struct SqliteBoardStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BoardStore for SqliteBoardStore<'_> {
    fn columns(&self, project_id: i64) -> StoreResult<Vec<Column>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, position, project_id FROM columns
             WHERE project_id = ?1 ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([project_id], |row| {
            Ok(Column {
                id: row.get(0)?,
                title: row.get(1)?,
                position: row.get(2)?,
                project_id: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn first_column_id(&self, project_id: i64) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM columns WHERE project_id = ?1 ORDER BY position ASC LIMIT 1",
                [project_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn swimlanes(&self, project_id: i64, active_only: bool) -> StoreResult<Vec<Swimlane>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, position, is_active, project_id FROM swimlanes
             WHERE project_id = ?1 AND (?2 = 0 OR is_active = 1)
             ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![project_id, active_only as i64], |row| {
            Ok(Swimlane {
                id: row.get(0)?,
                name: row.get(1)?,
                position: row.get(2)?,
                is_active: row.get::<_, i64>(3)? != 0,
                project_id: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn first_swimlane_id(&self, project_id: i64) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM swimlanes WHERE project_id = ?1 AND is_active = 1
                 ORDER BY position ASC LIMIT 1",
                [project_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn create_defaults(&self, project_id: i64) -> StoreResult<()> {
        let mut insert_column = self
            .conn
            .prepare("INSERT INTO columns (title, position, project_id) VALUES (?1, ?2, ?3)")?;
        for (index, title) in DEFAULT_COLUMNS.iter().enumerate() {
            insert_column.execute(params![title, index as i64 + 1, project_id])?;
        }
        self.conn.execute(
            "INSERT INTO swimlanes (name, position, project_id) VALUES (?1, 1, ?2)",
            params![DEFAULT_SWIMLANE, project_id],
        )?;
        Ok(())
    }
}
