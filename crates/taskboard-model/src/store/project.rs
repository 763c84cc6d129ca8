//! Project persistence.

use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{now, optional_id, optional_text, update_row, BoardStore, SqliteBoardStore};
use crate::error::StoreResult;
use crate::models::{NewProject, Project, ProjectRole, ProjectStatus, ProjectType};
use crate::values::Changes;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    is_active,
    is_private,
    owner_id,
    start_date,
    end_date,
    default_filter,
    last_modified
FROM projects";

/// Columns `update` may change.
const UPDATABLE: &[&str] = &[
    "name",
    "description",
    "is_active",
    "is_private",
    "owner_id",
    "start_date",
    "end_date",
    "default_filter",
];

/// Persistence contract for projects.
pub trait ProjectStore {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Project>>;
    fn get_all(&self) -> StoreResult<Vec<Project>>;
    /// Creates the project with its default board; the owner, if any,
    /// becomes project manager.
    fn create(&self, project: &NewProject) -> StoreResult<i64>;
    fn update(&self, id: i64, changes: &Changes) -> StoreResult<bool>;
    fn remove(&self, id: i64) -> StoreResult<bool>;
}

/// SQLite-backed project store.
pub struct SqliteProjectStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectStore for SqliteProjectStore<'_> {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Project>> {
        let project = self
            .conn
            .query_row(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1"), [id], parse_row)
            .optional()?;
        Ok(project)
    }

    fn get_all(&self) -> StoreResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY name COLLATE NOCASE"))?;
        let rows = stmt.query_map([], parse_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn create(&self, project: &NewProject) -> StoreResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO projects (
                name, description, is_active, is_private, owner_id,
                start_date, end_date, last_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                project.name.trim(),
                project.description.as_str(),
                project.status.as_db(),
                project.project_type.as_db(),
                project.owner_id.unwrap_or(0),
                project.start_date.as_deref().unwrap_or(""),
                project.end_date.as_deref().unwrap_or(""),
                now(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        SqliteBoardStore::new(&tx).create_defaults(id)?;
        if let Some(owner_id) = project.owner_id {
            tx.execute(
                "INSERT INTO project_has_users (project_id, user_id, role) VALUES (?1, ?2, ?3)",
                params![id, owner_id, ProjectRole::Manager.as_str()],
            )?;
        }
        tx.commit()?;

        info!("event=project_create module=store status=ok project_id={id}");
        Ok(id)
    }

    fn update(&self, id: i64, changes: &Changes) -> StoreResult<bool> {
        let changes = changes.clone().set("last_modified", now());
        let mut allowed = UPDATABLE.to_vec();
        allowed.push("last_modified");
        update_row(self.conn, "projects", &allowed, id, &changes)
    }

    fn remove(&self, id: i64) -> StoreResult<bool> {
        let removed = self.conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}

fn parse_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status: ProjectStatus::from_db(row.get(3)?),
        project_type: ProjectType::from_db(row.get(4)?),
        owner_id: optional_id(row.get(5)?),
        start_date: optional_text(row.get(6)?),
        end_date: optional_text(row.get(7)?),
        default_filter: row.get(8)?,
        last_modified: row.get(9)?,
    })
}
