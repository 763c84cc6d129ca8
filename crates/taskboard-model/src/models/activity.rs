//! Project activity (event feed) model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event names recorded in the activity feed.
pub mod events {
    pub const TASK_CREATE: &str = "task.create";
    pub const TASK_UPDATE: &str = "task.update";
    pub const TASK_CLOSE: &str = "task.close";
    pub const TASK_OPEN: &str = "task.open";
    pub const TASK_REMOVE: &str = "task.remove";
    pub const TASK_MOVE_COLUMN: &str = "task.move.column";
    pub const TASK_ASSIGNEE_CHANGE: &str = "task.assignee_change";
    pub const COMMENT_CREATE: &str = "comment.create";
    pub const SUBTASK_CREATE: &str = "subtask.create";
}

/// One entry of a project's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub date_creation: i64,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    /// Snapshot of the entities involved, as recorded at event time.
    pub data: Map<String, Value>,
}

/// Fields accepted when recording an activity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub event_name: String,
    pub creator_id: Option<i64>,
    pub project_id: i64,
    pub task_id: Option<i64>,
    pub data: Map<String, Value>,
}
