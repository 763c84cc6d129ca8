//! Recurrence commands.

use taskboard_model::prelude::*;

use super::{parse_fields, CommandContext, Result};
use crate::app::App;
use crate::controller::task_recurrence::TaskRecurrenceController;
use crate::output::{emit, emit_submission};

/// Prints the recurrence form of a task.
pub fn execute_show(ctx: &CommandContext, app: &App, task_id: i64) -> Result<()> {
    let response = TaskRecurrenceController::new(app).edit(task_id, Values::new(), ValidationErrors::new());
    emit(ctx, app, &response)
}

/// Updates recurrence fields from `key=value` pairs.
///
/// An invalid submission prints the form again with its errors and fails.
pub fn execute_set(ctx: &CommandContext, app: &App, task_id: i64, fields: &[String]) -> Result<()> {
    let values = parse_fields(fields)?;
    emit_submission(ctx, app, &TaskRecurrenceController::new(app).update(task_id, values))
}
