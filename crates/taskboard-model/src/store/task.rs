//! Task persistence.

use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    now, optional_id, optional_timestamp, update_row, BoardStore, SqliteBoardStore,
};
use crate::color::DEFAULT_COLOR;
use crate::error::{StoreError, StoreResult};
use crate::models::{
    NewTask, Recurrence, RecurrenceBasedate, RecurrenceStatus, RecurrenceTimeframe,
    RecurrenceTrigger, Task, TaskStatus,
};
use crate::values::Changes;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    project_id,
    column_id,
    swimlane_id,
    owner_id,
    creator_id,
    category_id,
    color_id,
    position,
    is_active,
    priority,
    reference,
    date_creation,
    date_modification,
    date_completed,
    date_started,
    date_due,
    date_moved,
    recurrence_status,
    recurrence_trigger,
    recurrence_factor,
    recurrence_timeframe,
    recurrence_basedate,
    recurrence_parent,
    recurrence_child
FROM tasks";

const UPDATABLE: &[&str] = &[
    "title",
    "description",
    "column_id",
    "swimlane_id",
    "owner_id",
    "category_id",
    "color_id",
    "position",
    "is_active",
    "priority",
    "reference",
    "date_completed",
    "date_started",
    "date_due",
    "date_moved",
    "date_modification",
    "recurrence_status",
    "recurrence_trigger",
    "recurrence_factor",
    "recurrence_timeframe",
    "recurrence_basedate",
    "recurrence_parent",
    "recurrence_child",
];

/// Persistence contract for tasks.
pub trait TaskStore {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Task>>;
    /// Returns the project's tasks ordered by id.
    fn get_all(&self, project_id: i64) -> StoreResult<Vec<Task>>;
    fn create(&self, task: &NewTask) -> StoreResult<i64>;
    /// Applies a partial update; the modification date is always refreshed.
    fn update(&self, id: i64, changes: &Changes) -> StoreResult<bool>;
    fn remove(&self, id: i64) -> StoreResult<bool>;
}

/// SQLite-backed task store.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn next_position(&self, project_id: i64, column_id: i64, swimlane_id: i64) -> StoreResult<i64> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(position) FROM tasks
             WHERE project_id = ?1 AND column_id = ?2 AND swimlane_id = ?3 AND is_active = 1",
            params![project_id, column_id, swimlane_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0) + 1)
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn get_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        let row = self
            .conn
            .query_row(&format!("{TASK_SELECT_SQL} WHERE id = ?1"), [id], parse_row)
            .optional()?;
        row.transpose()
    }

    fn get_all(&self, project_id: i64) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE project_id = ?1 ORDER BY id"))?;
        let rows = stmt.query_map([project_id], parse_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row??);
        }
        Ok(tasks)
    }

    fn create(&self, task: &NewTask) -> StoreResult<i64> {
        let board = SqliteBoardStore::new(self.conn);
        let column_id = match task.column_id {
            Some(id) => id,
            None => board.first_column_id(task.project_id)?.ok_or_else(|| {
                StoreError::invalid_data(format!("project {} has no column", task.project_id))
            })?,
        };
        let swimlane_id = match task.swimlane_id {
            Some(id) => id,
            None => board.first_swimlane_id(task.project_id)?.unwrap_or(0),
        };
        let position = self.next_position(task.project_id, column_id, swimlane_id)?;
        let timestamp = now();
        let recurrence = &task.recurrence;

        self.conn.execute(
            "INSERT INTO tasks (
                title, description, project_id, column_id, swimlane_id,
                owner_id, creator_id, category_id, color_id, position,
                priority, reference, date_creation, date_modification, date_moved,
                date_started, date_due,
                recurrence_status, recurrence_trigger, recurrence_factor,
                recurrence_timeframe, recurrence_basedate, recurrence_parent
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?13, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21
            )",
            params![
                task.title.trim(),
                task.description.as_str(),
                task.project_id,
                column_id,
                swimlane_id,
                task.owner_id.unwrap_or(0),
                task.creator_id.unwrap_or(0),
                task.category_id.unwrap_or(0),
                task.color_id.as_deref().unwrap_or(DEFAULT_COLOR),
                position,
                task.priority,
                task.reference.as_str(),
                timestamp,
                task.date_started.unwrap_or(0),
                task.date_due.unwrap_or(0),
                recurrence.status.as_db(),
                recurrence.trigger.as_db(),
                recurrence.factor,
                recurrence.timeframe.as_db(),
                recurrence.basedate.as_db(),
                recurrence.parent,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(
            "event=task_create module=store status=ok task_id={id} project_id={}",
            task.project_id
        );
        Ok(id)
    }

    fn update(&self, id: i64, changes: &Changes) -> StoreResult<bool> {
        let changes = changes.clone().set("date_modification", now());
        update_row(self.conn, "tasks", UPDATABLE, id, &changes)
    }

    fn remove(&self, id: i64) -> StoreResult<bool> {
        let removed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}

fn parse_row(row: &Row<'_>) -> rusqlite::Result<StoreResult<Task>> {
    let recurrence = match parse_recurrence(row)? {
        Ok(recurrence) => recurrence,
        Err(err) => return Ok(Err(err)),
    };

    Ok(Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        project_id: row.get(3)?,
        column_id: row.get(4)?,
        swimlane_id: row.get(5)?,
        owner_id: optional_id(row.get(6)?),
        creator_id: optional_id(row.get(7)?),
        category_id: optional_id(row.get(8)?),
        color_id: row.get(9)?,
        position: row.get(10)?,
        status: TaskStatus::from_db(row.get(11)?),
        priority: row.get(12)?,
        reference: row.get(13)?,
        date_creation: row.get(14)?,
        date_modification: row.get(15)?,
        date_completed: optional_timestamp(row.get(16)?),
        date_started: optional_timestamp(row.get(17)?),
        date_due: optional_timestamp(row.get(18)?),
        date_moved: row.get(19)?,
        recurrence,
    }))
}

fn parse_recurrence(row: &Row<'_>) -> rusqlite::Result<StoreResult<Recurrence>> {
    let status: i64 = row.get(20)?;
    let trigger: i64 = row.get(21)?;
    let timeframe: i64 = row.get(23)?;
    let basedate: i64 = row.get(24)?;

    let parsed = (|| {
        Some(Recurrence {
            status: RecurrenceStatus::from_db(status)?,
            trigger: RecurrenceTrigger::from_db(trigger)?,
            factor: 0,
            timeframe: RecurrenceTimeframe::from_db(timeframe)?,
            basedate: RecurrenceBasedate::from_db(basedate)?,
            parent: None,
            child: None,
        })
    })();

    let Some(mut recurrence) = parsed else {
        return Ok(Err(StoreError::invalid_data(format!(
            "invalid recurrence settings ({status}, {trigger}, {timeframe}, {basedate})"
        ))));
    };
    recurrence.factor = row.get(22)?;
    recurrence.parent = row.get(25)?;
    recurrence.child = row.get(26)?;
    Ok(Ok(recurrence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::seeded;

    #[test]
    fn test_create_fills_board_defaults() {
        let conn = seeded();
        let store = SqliteTaskStore::new(&conn);
        let mut new_task = NewTask::new(1, "Write tests");
        new_task.creator_id = Some(1);
        let id = store.create(&new_task).unwrap();

        let task = store.get_by_id(id).unwrap().unwrap();
        let first_column = SqliteBoardStore::new(&conn).first_column_id(1).unwrap();
        assert_eq!(Some(task.column_id), first_column);
        assert_eq!(task.position, 1);
        assert_eq!(task.color_id, "yellow");
        assert!(task.is_open());
        assert_eq!(task.date_due, None);
        assert_eq!(task.recurrence, Recurrence::default());
    }

    #[test]
    fn test_positions_append_in_column() {
        let conn = seeded();
        let store = SqliteTaskStore::new(&conn);
        store.create(&NewTask::new(1, "a")).unwrap();
        let second = store.create(&NewTask::new(1, "b")).unwrap();
        assert_eq!(store.get_by_id(second).unwrap().unwrap().position, 2);
    }

    #[test]
    fn test_update_dates_and_recurrence() {
        let conn = seeded();
        let store = SqliteTaskStore::new(&conn);
        let id = store.create(&NewTask::new(1, "Pay rent")).unwrap();

        let changes = Changes::new()
            .set("date_started", 1_704_067_200_i64)
            .set("date_due", 1_706_745_600_i64)
            .set("recurrence_status", RecurrenceStatus::Pending.as_db())
            .set("recurrence_trigger", RecurrenceTrigger::Close.as_db())
            .set("recurrence_factor", 1_i64)
            .set("recurrence_timeframe", RecurrenceTimeframe::Months.as_db());
        assert!(store.update(id, &changes).unwrap());

        let task = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(task.date_started, Some(1_704_067_200));
        assert_eq!(task.date_due, Some(1_706_745_600));
        assert!(task.recurrence.fires_on_close());
        assert_eq!(task.recurrence.timeframe, RecurrenceTimeframe::Months);
    }

    #[test]
    fn test_update_refuses_project_move() {
        let conn = seeded();
        let store = SqliteTaskStore::new(&conn);
        let id = store.create(&NewTask::new(1, "x")).unwrap();
        let err = store
            .update(id, &Changes::new().set("project_id", 2_i64))
            .unwrap_err();
        assert!(matches!(err, StoreError::ReadOnlyField(_)));
    }

    #[test]
    fn test_create_in_project_without_columns_fails() {
        let conn = seeded();
        let store = SqliteTaskStore::new(&conn);
        let err = store.create(&NewTask::new(404, "orphan")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_remove() {
        let conn = seeded();
        let store = SqliteTaskStore::new(&conn);
        let id = store.create(&NewTask::new(1, "x")).unwrap();
        assert!(store.remove(id).unwrap());
        assert!(store.get_by_id(id).unwrap().is_none());
        assert!(store.get_all(1).unwrap().is_empty());
    }
}
