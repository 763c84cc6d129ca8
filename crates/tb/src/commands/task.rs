//! Task action commands.

use super::{CommandContext, Result};
use crate::app::App;
use crate::controller::task_status::TaskStatusController;
use crate::controller::task_view::TaskViewController;
use crate::output::emit;

/// Prints the action menu of a task.
pub fn execute_menu(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    emit(ctx, app, &TaskViewController::new(app).dropdown(task_id))
}

pub fn execute_start(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    emit(ctx, app, &TaskStatusController::new(app).start(task_id))
}

pub fn execute_close(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    emit(ctx, app, &TaskStatusController::new(app).close(task_id))
}

pub fn execute_open(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    emit(ctx, app, &TaskStatusController::new(app).open(task_id))
}

pub fn execute_remove(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    emit(ctx, app, &TaskStatusController::new(app).remove(task_id))
}
