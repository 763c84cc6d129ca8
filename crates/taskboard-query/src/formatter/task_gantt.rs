//! Task bars of a project's Gantt chart.

use std::cell::RefCell;
use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;
use taskboard_model::color::{ColorPalette, ColorProperties, DEFAULT_COLOR};
use taskboard_model::date::DateParser;
use taskboard_model::models::Column;
use taskboard_model::store::BoardStore;

use super::{Formatter, LinkBuilder};
use crate::record::Record;

/// One task on the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskGanttBar {
    pub id: i64,
    pub title: String,
    /// `[year, month, day]`.
    pub start: [i32; 3],
    pub end: [i32; 3],
    pub column_title: String,
    /// Assignee full name, else username; empty when unassigned.
    pub assignee: String,
    /// Completion percentage, one decimal.
    pub progress: f64,
    pub link: String,
    pub color: ColorProperties,
    pub not_defined: bool,
    pub date_started_not_defined: bool,
    pub date_due_not_defined: bool,
}

impl TaskGanttBar {
    /// Progress as shown on the bar, e.g. `33.3%`.
    pub fn progress_label(&self) -> String {
        format!("{}%", self.progress)
    }
}

/// Formats task rows; each project's columns are fetched once.
pub struct TaskGanttFormatter<'a> {
    board: &'a dyn BoardStore,
    links: &'a dyn LinkBuilder,
    dates: DateParser,
    columns: RefCell<BTreeMap<i64, Vec<Column>>>,
}

impl<'a> TaskGanttFormatter<'a> {
    pub fn new(board: &'a dyn BoardStore, links: &'a dyn LinkBuilder, dates: DateParser) -> Self {
        Self {
            board,
            links,
            dates,
            columns: RefCell::new(BTreeMap::new()),
        }
    }

    /// Column index of the task over the column count, as a percentage.
    fn progress(&self, record: &Record) -> f64 {
        if record.flag("is_active") == Some(false) {
            return 100.0;
        }

        let project_id = record.int("project_id").unwrap_or_default();
        let column_id = record.int("column_id").unwrap_or_default();
        let mut cache = self.columns.borrow_mut();
        let columns = cache.entry(project_id).or_insert_with(|| {
            self.board.columns(project_id).unwrap_or_else(|err| {
                warn!(
                    "event=gantt_columns module=formatter status=error project_id={project_id} error={err}"
                );
                Vec::new()
            })
        });

        if columns.is_empty() {
            return 0.0;
        }
        let index = columns
            .iter()
            .position(|c| c.id == column_id)
            .unwrap_or(columns.len());
        let percent = index as f64 * 100.0 / columns.len() as f64;
        (percent * 10.0).round() / 10.0
    }
}

impl Formatter for TaskGanttFormatter<'_> {
    type Output = TaskGanttBar;

    fn map(&self, record: &Record) -> TaskGanttBar {
        let id = record.int("id").unwrap_or_default();
        let started = record.timestamp("date_started");
        let due = record.timestamp("date_due");
        let start = started.unwrap_or_else(|| self.dates.now_timestamp());
        let end = due.unwrap_or(start);

        let assignee = record
            .non_empty("assignee_name")
            .or_else(|| record.non_empty("assignee_username"))
            .unwrap_or_default()
            .to_string();

        TaskGanttBar {
            id,
            title: record.text_or_empty("title"),
            start: self.dates.ymd(start),
            end: self.dates.ymd(end),
            column_title: record.text_or_empty("column_title"),
            assignee,
            progress: self.progress(record),
            link: self.links.link(
                "TaskViewController",
                "show",
                &[
                    ("project_id", record.int("project_id").unwrap_or_default().to_string()),
                    ("task_id", id.to_string()),
                ],
            ),
            color: ColorPalette.properties(record.text("color_id").unwrap_or(DEFAULT_COLOR)),
            not_defined: started.is_none() || due.is_none(),
            date_started_not_defined: started.is_none(),
            date_due_not_defined: due.is_none(),
        }
    }
}
