//! Entries of the activity feed.

use chrono::TimeZone;
use serde::Serialize;
use serde_json::{Map, Value};
use taskboard_model::date::DateParser;
use taskboard_model::models::events;

use super::Formatter;
use crate::record::Record;

/// One event as shown in a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEvent {
    pub id: i64,
    pub date_creation: i64,
    /// Creation time in the configured time zone, `YYYY-MM-DD HH:MM`.
    pub date: String,
    pub event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
    pub project_id: i64,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    /// Author full name, else username; empty for system events.
    pub author: String,
    pub author_username: String,
    pub email: String,
    /// Snapshot recorded with the event.
    pub data: Map<String, Value>,
    pub event_title: String,
    pub event_content: String,
}

/// Formats activity rows.
#[derive(Debug, Clone, Default)]
pub struct ActivityEventFormatter {
    dates: DateParser,
}

impl ActivityEventFormatter {
    pub fn new(dates: DateParser) -> Self {
        Self { dates }
    }

    fn date(&self, timestamp: i64) -> String {
        self.dates
            .timezone()
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

fn snapshot(record: &Record) -> Map<String, Value> {
    record
        .text("data")
        .and_then(|raw| serde_json::from_str::<Map<String, Value>>(raw).ok())
        .unwrap_or_default()
}

fn data_text<'d>(data: &'d Map<String, Value>, path: &[&str]) -> Option<&'d str> {
    let (last, parents) = path.split_last()?;
    let mut current = data;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)?.as_str()
}

/// Human title of an event.
fn event_title(event_name: &str, author: &str, task_id: i64, data: &Map<String, Value>) -> String {
    let author = if author.is_empty() { "Someone" } else { author };
    match event_name {
        events::TASK_CREATE => format!("{author} created the task #{task_id}"),
        events::TASK_UPDATE => format!("{author} updated the task #{task_id}"),
        events::TASK_CLOSE => format!("{author} closed the task #{task_id}"),
        events::TASK_OPEN => format!("{author} opened the task #{task_id}"),
        events::TASK_REMOVE => format!("{author} removed the task #{task_id}"),
        events::TASK_MOVE_COLUMN => format!(
            "{author} moved the task #{task_id} to the column \"{}\"",
            data_text(data, &["task", "column_title"]).unwrap_or_default()
        ),
        events::TASK_ASSIGNEE_CHANGE => match data_text(data, &["task", "assignee_name"]) {
            Some(assignee) if !assignee.is_empty() => {
                format!("{author} changed the assignee of the task #{task_id} to {assignee}")
            }
            _ => format!("{author} removed the assignee of the task #{task_id}"),
        },
        events::COMMENT_CREATE => format!("{author} commented the task #{task_id}"),
        events::SUBTASK_CREATE => format!("{author} created a subtask for the task #{task_id}"),
        other => format!("{author}: {other}"),
    }
}

impl Formatter for ActivityEventFormatter {
    type Output = ActivityEvent;

    fn map(&self, record: &Record) -> ActivityEvent {
        let data = snapshot(record);
        let author_username = record.text_or_empty("author_username");
        let author = record
            .non_empty("author_name")
            .map(str::to_string)
            .unwrap_or_else(|| author_username.clone());
        let event_name = record.text_or_empty("event_name");
        let task_id = record.id("task_id");
        let date_creation = record.int("date_creation").unwrap_or_default();

        let event_content = data_text(&data, &["task", "title"])
            .or_else(|| record.non_empty("task_title"))
            .unwrap_or_default()
            .to_string();

        ActivityEvent {
            id: record.int("id").unwrap_or_default(),
            date_creation,
            date: self.date(date_creation),
            event_title: event_title(&event_name, &author, task_id.unwrap_or_default(), &data),
            event_name,
            creator_id: record.id("creator_id"),
            project_id: record.int("project_id").unwrap_or_default(),
            project_name: record.text_or_empty("project_name"),
            task_id,
            author,
            author_username,
            email: record.text_or_empty("author_email"),
            data,
            event_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value as SqlValue;

    fn record(event_name: &str, data: &str) -> Record {
        Record::from_pairs([
            ("id", SqlValue::Integer(4)),
            ("date_creation", SqlValue::Integer(1_704_067_200)),
            ("event_name", SqlValue::Text(event_name.to_string())),
            ("creator_id", SqlValue::Integer(2)),
            ("project_id", SqlValue::Integer(1)),
            ("task_id", SqlValue::Integer(9)),
            ("data", SqlValue::Text(data.to_string())),
            ("author_username", SqlValue::Text("bob".to_string())),
            ("author_name", SqlValue::Text(String::new())),
            ("project_name", SqlValue::Text("Website".to_string())),
        ])
    }

    #[test]
    fn test_title_and_content() {
        let event = ActivityEventFormatter::default()
            .map(&record("task.close", r#"{"task":{"title":"Fix login"}}"#));
        assert_eq!(event.author, "bob");
        assert_eq!(event.event_title, "bob closed the task #9");
        assert_eq!(event.event_content, "Fix login");
        assert_eq!(event.date, "2024-01-01 00:00");
    }

    #[test]
    fn test_invalid_data_is_empty() {
        let event = ActivityEventFormatter::default().map(&record("task.create", "not json"));
        assert!(event.data.is_empty());
        assert_eq!(event.event_content, "");
    }

    #[test]
    fn test_move_column_title() {
        let event = ActivityEventFormatter::default().map(&record(
            "task.move.column",
            r#"{"task":{"title":"x","column_title":"Done"}}"#,
        ));
        assert_eq!(event.event_title, "bob moved the task #9 to the column \"Done\"");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let event = ActivityEventFormatter::default().map(&Record::default());
        assert_eq!(event.id, 0);
        assert_eq!(event.task_id, None);
        assert_eq!(event.event_title, "Someone: ");
    }
}
