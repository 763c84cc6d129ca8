//! Mapping of fetched rows to view models.

mod activity_event;
mod project_gantt;
mod task_gantt;

pub use activity_event::{ActivityEvent, ActivityEventFormatter};
pub use project_gantt::{ProjectGanttBar, ProjectGanttFormatter};
pub use task_gantt::{TaskGanttBar, TaskGanttFormatter};

use crate::record::Record;

/// Maps one record to one view model.
///
/// Formatters never fail: a missing optional field yields a default value.
pub trait Formatter {
    type Output;

    fn map(&self, record: &Record) -> Self::Output;
}

/// Builds application links for view models.
pub trait LinkBuilder {
    /// Returns the link to `controller`/`action` with query parameters.
    fn link(&self, controller: &str, action: &str, params: &[(&str, String)]) -> String;
}
