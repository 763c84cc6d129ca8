//! SQLite-backed persistence, one store per entity.
//!
//! Each store is described by a trait so callers depend on the contract and
//! not on SQLite. The contracts follow the same conventions:
//!
//! - `get_by_id` returns `Ok(None)` for a missing row; not-found is never an
//!   error.
//! - `update` and `remove` return `Ok(false)` when no row matched.
//! - `create` returns the new row id.
//! - Constraint violations surface as [`StoreError`] and leave the database
//!   unchanged.

mod activity;
mod board;
mod category;
mod project;
mod task;
mod user;

pub use activity::{ActivityStore, SqliteActivityStore};
pub use board::{BoardStore, SqliteBoardStore};
pub use category::{CategoryStore, SqliteCategoryStore};
pub use project::{ProjectStore, SqliteProjectStore};
pub use task::{SqliteTaskStore, TaskStore};
pub use user::{SqliteUserStore, UserStore};

use log::debug;
use rusqlite::{params_from_iter, Connection};

use crate::error::{StoreError, StoreResult};
use crate::values::Changes;

/// Converts a stored id where `0` means "none".
pub(crate) fn optional_id(value: i64) -> Option<i64> {
    (value > 0).then_some(value)
}

/// Converts a stored timestamp where `0` means "not set".
pub(crate) fn optional_timestamp(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

/// Converts a stored string where empty means "not set".
pub(crate) fn optional_text(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

/// Returns the current Unix timestamp.
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Applies `changes` to one row of `table`, restricted to `allowed` columns.
///
/// Returns `Ok(false)` when no row has the given id. An empty change set is
/// a successful no-op only if the row exists.
pub(crate) fn update_row(
    conn: &Connection,
    table: &str,
    allowed: &[&str],
    id: i64,
    changes: &Changes,
) -> StoreResult<bool> {
    if let Some((column, _)) = changes
        .fields()
        .iter()
        .find(|(column, _)| !allowed.contains(&column.as_str()))
    {
        return Err(StoreError::ReadOnlyField(column.clone()));
    }

    if changes.is_empty() {
        let exists = conn
            .prepare(&format!("SELECT 1 FROM {table} WHERE id = ?1"))?
            .exists([id])?;
        return Ok(exists);
    }

    let assignments = changes
        .fields()
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {table} SET {assignments} WHERE id = ?{}",
        changes.fields().len() + 1
    );

    let mut params: Vec<rusqlite::types::Value> =
        changes.fields().iter().map(|(_, v)| v.clone()).collect();
    params.push(id.into());

    let updated = conn.execute(&sql, params_from_iter(params))?;
    debug!("event=row_update module=store table={table} id={id} changed={updated}");
    Ok(updated > 0)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the store tests.

    use rusqlite::Connection;

    use crate::db::open_db_in_memory;
    use crate::models::{NewProject, NewUser, UserRole};

    use super::{ProjectStore, SqliteProjectStore, SqliteUserStore, UserStore};

    /// Opens a database with one admin (`admin`, id 1) and one team project
    /// (`Website`, id 1) owned by the admin.
    pub fn seeded() -> Connection {
        let conn = open_db_in_memory().expect("open in-memory db");
        let users = SqliteUserStore::new(&conn);
        let mut admin = NewUser::new("admin");
        admin.role = UserRole::Admin;
        users.create(&admin).expect("create admin");
        SqliteProjectStore::new(&conn)
            .create(&NewProject::team("Website").owned_by(1))
            .expect("create project");
        conn
    }
}
