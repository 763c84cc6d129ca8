//! Gantt commands.

use serde_json::json;
use taskboard_model::prelude::*;

use super::{parse_fields, CommandContext, Result};
use crate::app::App;
use crate::cli::SortMode;
use crate::controller::gantt::GanttController;
use crate::output::{emit, emit_submission};

/// Prints the chart of every active project.
pub fn execute_projects(ctx: &CommandContext, app: &App) -> Result<()> {
    emit(ctx, app, &GanttController::new(app).projects())
}

/// Prints the task chart of a project.
pub fn execute_project(
    ctx: &CommandContext,
    app: &App,
    project_id: i64,
    search: Option<&str>,
    sort: SortMode,
) -> Result<()> {
    let response = GanttController::new(app).project(project_id, search, Some(sort.as_str()));
    emit(ctx, app, &response)
}

/// Moves the planned dates of a project.
pub fn execute_project_dates(ctx: &CommandContext, app: &App, project_id: i64, start: &str, end: &str) -> Result<()> {
    let body = json!({ "id": project_id, "start": start, "end": end });
    emit(ctx, app, &GanttController::new(app).save_project_date(&body))
}

/// Moves the start and due dates of a task.
pub fn execute_task_dates(
    ctx: &CommandContext,
    app: &App,
    project_id: i64,
    task_id: i64,
    start: &str,
    end: &str,
) -> Result<()> {
    let body = json!({ "id": task_id, "start": start, "end": end });
    emit(ctx, app, &GanttController::new(app).save_task_date(project_id, &body))
}

/// Prints the task creation form.
pub fn execute_task_form(ctx: &CommandContext, app: &App, project_id: i64, fields: &[String]) -> Result<()> {
    let values = parse_fields(fields)?;
    let response = GanttController::new(app).task_form(project_id, values, ValidationErrors::new());
    emit(ctx, app, &response)
}

/// Creates a task from the chart. An invalid task prints the form with its
/// errors and fails.
pub fn execute_add_task(
    ctx: &CommandContext,
    app: &App,
    project_id: i64,
    title: &str,
    fields: &[String],
) -> Result<()> {
    let mut values = parse_fields(fields)?;
    values.insert("title", title);
    emit_submission(ctx, app, &GanttController::new(app).save_task(project_id, values))
}
