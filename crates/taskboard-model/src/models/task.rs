//! Task model.

use serde::{Deserialize, Serialize};

use super::{
    RecurrenceBasedate, RecurrenceStatus, RecurrenceTimeframe, RecurrenceTrigger, TaskStatus,
};

/// A task (one card on the board).
///
/// Timestamps are Unix seconds; `None` means the date is not set (stored as
/// `0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: i64,
    pub column_id: i64,
    pub swimlane_id: i64,
    /// Assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub color_id: String,
    pub position: i64,
    pub status: TaskStatus,
    pub priority: i64,
    #[serde(default)]
    pub reference: String,
    pub date_creation: i64,
    pub date_modification: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_due: Option<i64>,
    pub date_moved: i64,
    pub recurrence: Recurrence,
}

impl Task {
    /// Returns true if the task is open.
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }
}

/// Recurrence settings of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub status: RecurrenceStatus,
    pub trigger: RecurrenceTrigger,
    /// Number of timeframe units between occurrences.
    pub factor: i64,
    pub timeframe: RecurrenceTimeframe,
    pub basedate: RecurrenceBasedate,
    /// The task this one was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    /// The task generated from this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<i64>,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            status: RecurrenceStatus::None,
            trigger: RecurrenceTrigger::FirstColumn,
            factor: 0,
            timeframe: RecurrenceTimeframe::Days,
            basedate: RecurrenceBasedate::DueDate,
            parent: None,
            child: None,
        }
    }
}

impl Recurrence {
    /// Returns true if closing the task should spawn the next occurrence.
    pub fn fires_on_close(&self) -> bool {
        self.status == RecurrenceStatus::Pending && self.trigger == RecurrenceTrigger::Close
    }
}

/// Fields accepted when creating a task.
///
/// Unset board placement falls back to the project's first column and
/// swimlane; the position is appended at the end of the column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub project_id: i64,
    pub column_id: Option<i64>,
    pub swimlane_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub creator_id: Option<i64>,
    pub category_id: Option<i64>,
    pub color_id: Option<String>,
    pub priority: i64,
    pub reference: String,
    pub date_started: Option<i64>,
    pub date_due: Option<i64>,
    pub recurrence: Recurrence,
}

impl NewTask {
    /// Creates a task with a title in the given project.
    pub fn new(project_id: i64, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            project_id,
            ..Self::default()
        }
    }
}
