//! Activity stream commands.

use super::{CommandContext, Result};
use crate::app::App;
use crate::controller::activity::ActivityController;
use crate::output::emit;

/// Searches events across the user's projects.
pub fn execute_search(ctx: &CommandContext, app: &App, query: &str) -> Result<()> {
    emit(ctx, app, &ActivityController::new(app).search(query))
}

/// Prints the latest events of a project.
pub fn execute_project(ctx: &CommandContext, app: &App, project_id: i64) -> Result<()> {
    emit(ctx, app, &ActivityController::new(app).project(project_id))
}

/// Prints the latest events across projects.
pub fn execute_projects(ctx: &CommandContext, app: &App, project_ids: &[i64]) -> Result<()> {
    emit(ctx, app, &ActivityController::new(app).projects(project_ids))
}

/// Prints every event of a task.
pub fn execute_task(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    emit(ctx, app, &ActivityController::new(app).task(task_id))
}
