//! Activity feed persistence.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};

use super::{now, optional_id};
use crate::error::StoreResult;
use crate::models::{Activity, NewActivity};

const ACTIVITY_SELECT_SQL: &str = "SELECT
    id, date_creation, event_name, creator_id, project_id, task_id, data
FROM project_activities";

/// Persistence contract for the project activity feed.
///
/// Reads go through the activity query pipeline; this store only writes and
/// looks up single events.
pub trait ActivityStore {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Activity>>;
    /// Records an event stamped with the current time.
    fn create(&self, activity: &NewActivity) -> StoreResult<i64>;
    /// Deletes events older than `before`; returns how many were removed.
    fn cleanup(&self, before: i64) -> StoreResult<usize>;
}

/// SQLite-backed activity store.
pub struct SqliteActivityStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ActivityStore for SqliteActivityStore<'_> {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Activity>> {
        let row = self
            .conn
            .query_row(&format!("{ACTIVITY_SELECT_SQL} WHERE id = ?1"), [id], parse_row)
            .optional()?;
        row.transpose()
    }

    fn create(&self, activity: &NewActivity) -> StoreResult<i64> {
        let data = serde_json::to_string(&activity.data)?;
        self.conn.execute(
            "INSERT INTO project_activities
                (date_creation, event_name, creator_id, project_id, task_id, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                now(),
                activity.event_name,
                activity.creator_id.unwrap_or(0),
                activity.project_id,
                activity.task_id.unwrap_or(0),
                data,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(
            "event=activity_create module=store event_name={} project_id={} id={id}",
            activity.event_name, activity.project_id
        );
        Ok(id)
    }

    fn cleanup(&self, before: i64) -> StoreResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM project_activities WHERE date_creation < ?1", [before])?;
        Ok(removed)
    }
}

fn parse_row(row: &Row<'_>) -> rusqlite::Result<StoreResult<Activity>> {
    let raw: String = row.get(6)?;
    let data = match serde_json::from_str::<Map<String, Value>>(&raw) {
        Ok(data) => data,
        Err(err) => return Ok(Err(err.into())),
    };

    Ok(Ok(Activity {
        id: row.get(0)?,
        date_creation: row.get(1)?,
        event_name: row.get(2)?,
        creator_id: optional_id(row.get(3)?),
        project_id: row.get(4)?,
        task_id: optional_id(row.get(5)?),
        data,
    }))
}
