//! Recurrence settings of a task.

use log::{info, warn};
use serde_json::json;
use taskboard_model::prelude::*;

use super::{get_task, require_edit, respond, Outcome};
use crate::activity::ActivityRecorder;
use crate::app::App;
use crate::response::Response;
use crate::view::choices;

const RECURRENCE_FIELDS: [&str; 5] = [
    "recurrence_status",
    "recurrence_trigger",
    "recurrence_factor",
    "recurrence_timeframe",
    "recurrence_basedate",
];

pub struct TaskRecurrenceController<'a> {
    app: &'a App,
}

impl<'a> TaskRecurrenceController<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Recurrence form. Empty `values` are filled from the stored task.
    pub fn edit(&self, task_id: i64, values: Values, errors: ValidationErrors) -> Response {
        respond(self.try_edit(task_id, values, errors))
    }

    fn try_edit(&self, task_id: i64, values: Values, errors: ValidationErrors) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        let values = if values.is_empty() {
            recurrence_values(&task)
        } else {
            values
        };

        Ok(Response::page(
            "task_recurrence/edit.html",
            json!({
                "title": format!("Edit recurrence of #{}", task.id),
                "task": task,
                "values": values,
                "errors": errors,
                "action": self.app.urls().to(
                    "TaskRecurrenceController",
                    "update",
                    &[
                        ("task_id", task.id.to_string()),
                        ("project_id", task.project_id.to_string()),
                    ],
                ),
                "recurrence_status_list": choices(RecurrenceStatus::choices()),
                "recurrence_trigger_list": choices(RecurrenceTrigger::choices()),
                "recurrence_timeframe_list": choices(RecurrenceTimeframe::choices()),
                "recurrence_basedate_list": choices(RecurrenceBasedate::choices()),
            }),
        ))
    }

    /// Validates and saves the recurrence fields, then returns to the task.
    pub fn update(&self, task_id: i64, values: Values) -> Response {
        respond(self.try_update(task_id, values))
    }

    fn try_update(&self, task_id: i64, mut values: Values) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        require_edit(self.app, task.project_id)?;
        values.insert("id", task.id);

        if let Err(errors) = self.app.task_validator().validate_edit_recurrence(&values) {
            info!("event=recurrence_update module=controller status=invalid task_id={task_id}");
            return Ok(self.edit(task.id, values, errors));
        }

        let changes = RECURRENCE_FIELDS
            .iter()
            .filter_map(|field| values.int(field).map(|value| (*field, value)))
            .fold(Changes::new(), |changes, (field, value)| changes.set(field, value));

        let tasks = self.app.tasks();
        match tasks.update(task.id, &changes) {
            Ok(true) => {
                if let Ok(Some(updated)) = tasks.get_by_id(task.id) {
                    let store = self.app.activities();
                    ActivityRecorder::new(&store, self.app.user().id)
                        .task_event(events::TASK_UPDATE, &updated);
                }
                info!("event=recurrence_update module=controller status=ok task_id={task_id}");
                self.app.session().success("Task updated successfully.");
            }
            Ok(false) => {
                self.app.session().failure("Unable to update your task.");
            }
            Err(err) => {
                warn!("event=recurrence_update module=controller status=error task_id={task_id} error={err}");
                self.app.session().failure("Unable to update your task.");
            }
        }

        Ok(Response::redirect(self.app.urls().to(
            "TaskViewController",
            "show",
            &[
                ("task_id", task.id.to_string()),
                ("project_id", task.project_id.to_string()),
            ],
        )))
    }
}

fn recurrence_values(task: &Task) -> Values {
    let recurrence = &task.recurrence;
    Values::new()
        .with("id", task.id)
        .with("recurrence_status", recurrence.status.as_db())
        .with("recurrence_trigger", recurrence.trigger.as_db())
        .with("recurrence_factor", recurrence.factor)
        .with("recurrence_timeframe", recurrence.timeframe.as_db())
        .with("recurrence_basedate", recurrence.basedate.as_db())
}
