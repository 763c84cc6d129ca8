//! Task lifecycle: start, close, reopen, remove.
//!
//! Closing a task whose recurrence is pending and triggered on close spawns
//! the next occurrence in the first column, with its due date pushed by the
//! recurrence factor.

use chrono::{DateTime, Days, Months, TimeZone, Utc};
use chrono_tz::Tz;
use log::{info, warn};
use taskboard_model::prelude::*;

use super::{get_task, internal, require_edit, respond, Outcome};
use crate::activity::ActivityRecorder;
use crate::app::App;
use crate::response::Response;

pub struct TaskStatusController<'a> {
    app: &'a App,
}

impl<'a> TaskStatusController<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Closes a task and generates its next occurrence when due.
    pub fn close(&self, task_id: i64) -> Response {
        respond(self.try_close(task_id))
    }

    fn try_close(&self, task_id: i64) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        require_edit(self.app, task.project_id)?;

        let now = self.app.dates().now_timestamp();
        let changes = Changes::new()
            .set("is_active", TaskStatus::Closed.as_db())
            .set("date_completed", now);
        if !self.apply(&task, &changes, events::TASK_CLOSE)? {
            self.app.session().failure("Unable to close this task.");
            return Ok(self.redirect_to_task(&task));
        }

        if task.recurrence.fires_on_close() {
            self.spawn_occurrence(&task)?;
        }
        self.app.session().success("Task closed successfully.");
        Ok(self.redirect_to_task(&task))
    }

    /// Reopens a closed task.
    pub fn open(&self, task_id: i64) -> Response {
        respond(self.try_open(task_id))
    }

    fn try_open(&self, task_id: i64) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        require_edit(self.app, task.project_id)?;

        let changes = Changes::new()
            .set("is_active", TaskStatus::Open.as_db())
            .set("date_completed", 0);
        if self.apply(&task, &changes, events::TASK_OPEN)? {
            self.app.session().success("Task opened successfully.");
        } else {
            self.app.session().failure("Unable to open this task.");
        }
        Ok(self.redirect_to_task(&task))
    }

    /// Sets the start date to now unless one is already set.
    pub fn start(&self, task_id: i64) -> Response {
        respond(self.try_start(task_id))
    }

    fn try_start(&self, task_id: i64) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        require_edit(self.app, task.project_id)?;

        if task.date_started.is_none() {
            let changes = Changes::new().set("date_started", self.app.dates().now_timestamp());
            if self.apply(&task, &changes, events::TASK_UPDATE)? {
                self.app.session().success("Task updated successfully.");
            } else {
                self.app.session().failure("Unable to update your task.");
            }
        }
        Ok(self.redirect_to_task(&task))
    }

    /// Removes a task the user created or manages.
    pub fn remove(&self, task_id: i64) -> Response {
        respond(self.try_remove(task_id))
    }

    fn try_remove(&self, task_id: i64) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        let allowed = self
            .app
            .permission()
            .can_remove_task(self.app.user(), &task)
            .map_err(internal("task_remove"))?;
        if !allowed {
            return Err(Response::forbidden());
        }

        if self.app.tasks().remove(task.id).map_err(internal("task_remove"))? {
            let store = self.app.activities();
            ActivityRecorder::new(&store, self.app.user().id).task_event(events::TASK_REMOVE, &task);
            info!("event=task_remove module=controller status=ok task_id={task_id}");
            self.app.session().success("Task removed successfully.");
        } else {
            self.app.session().failure("Unable to remove this task.");
        }
        Ok(Response::redirect(self.app.urls().to(
            "BoardViewController",
            "show",
            &[("project_id", task.project_id.to_string())],
        )))
    }

    /// Updates the task and records `event_name` on success.
    fn apply(&self, task: &Task, changes: &Changes, event_name: &str) -> Outcome<bool> {
        let tasks = self.app.tasks();
        let updated = tasks.update(task.id, changes).map_err(internal(event_name))?;
        if updated {
            if let Ok(Some(task)) = tasks.get_by_id(task.id) {
                let store = self.app.activities();
                ActivityRecorder::new(&store, self.app.user().id).task_event(event_name, &task);
            }
            info!("event={event_name} module=controller status=ok task_id={}", task.id);
        }
        Ok(updated)
    }

    fn spawn_occurrence(&self, task: &Task) -> Outcome<Option<i64>> {
        let dates = self.app.dates();
        let recurrence = &task.recurrence;
        let now = dates.now_timestamp();
        let base = match recurrence.basedate {
            RecurrenceBasedate::TriggerDate => now,
            RecurrenceBasedate::DueDate => task.date_due.unwrap_or(now),
        };
        let Some(date_due) = next_due_date(base, recurrence.factor, recurrence.timeframe, dates.timezone()) else {
            warn!("event=task_recurrence module=controller status=invalid task_id={}", task.id);
            return Ok(None);
        };

        let column_id = self
            .app
            .board()
            .first_column_id(task.project_id)
            .map_err(internal("task_recurrence"))?;
        let next = NewTask {
            title: task.title.clone(),
            description: task.description.clone(),
            project_id: task.project_id,
            column_id,
            swimlane_id: Some(task.swimlane_id),
            owner_id: task.owner_id,
            creator_id: task.creator_id,
            category_id: task.category_id,
            color_id: Some(task.color_id.clone()),
            priority: task.priority,
            reference: task.reference.clone(),
            date_started: None,
            date_due: Some(date_due),
            recurrence: Recurrence {
                status: RecurrenceStatus::Pending,
                parent: Some(task.id),
                child: None,
                ..recurrence.clone()
            },
        };

        let tasks = self.app.tasks();
        let child_id = match tasks.create(&next) {
            Ok(id) => id,
            Err(err) => {
                warn!("event=task_recurrence module=controller status=error task_id={} error={err}", task.id);
                self.app.session().failure("Unable to create the next occurrence of this task.");
                return Ok(None);
            }
        };
        let changes = Changes::new()
            .set("recurrence_status", RecurrenceStatus::Processed.as_db())
            .set("recurrence_child", child_id);
        tasks.update(task.id, &changes).map_err(internal("task_recurrence"))?;

        if let Ok(Some(child)) = tasks.get_by_id(child_id) {
            let store = self.app.activities();
            ActivityRecorder::new(&store, self.app.user().id).task_event(events::TASK_CREATE, &child);
        }
        info!(
            "event=task_recurrence module=controller status=ok task_id={} child_id={child_id}",
            task.id
        );
        Ok(Some(child_id))
    }

    fn redirect_to_task(&self, task: &Task) -> Response {
        Response::redirect(self.app.urls().to(
            "TaskViewController",
            "show",
            &[
                ("task_id", task.id.to_string()),
                ("project_id", task.project_id.to_string()),
            ],
        ))
    }
}

/// Pushes `base` forward by `factor` units of `timeframe`, on the calendar of
/// `tz`. Months and years keep the day of month, clamped to the month's end.
pub fn next_due_date(base: i64, factor: i64, timeframe: RecurrenceTimeframe, tz: Tz) -> Option<i64> {
    let factor = u32::try_from(factor).ok()?;
    let local = tz.from_utc_datetime(&DateTime::<Utc>::from_timestamp(base, 0)?.naive_utc());
    let next = match timeframe {
        RecurrenceTimeframe::Days => local.checked_add_days(Days::new(u64::from(factor)))?,
        RecurrenceTimeframe::Months => local.checked_add_months(Months::new(factor))?,
        RecurrenceTimeframe::Years => local.checked_add_months(Months::new(factor.checked_mul(12)?))?,
    };
    Some(next.timestamp())
}
