//! Task views.

use serde_json::json;
use taskboard_model::prelude::*;

use super::{get_task, internal, respond, Outcome};
use crate::app::App;
use crate::response::Response;
use crate::view::TaskDropdown;

pub struct TaskViewController<'a> {
    app: &'a App,
}

impl<'a> TaskViewController<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Action menu of a task.
    pub fn dropdown(&self, task_id: i64) -> Response {
        respond(self.try_dropdown(task_id))
    }

    fn try_dropdown(&self, task_id: i64) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        let can_remove = self
            .app
            .permission()
            .can_remove_task(self.app.user(), &task)
            .map_err(internal("task_dropdown"))?;

        let menu = TaskDropdown::build(&task, can_remove, self.app.urls(), self.app.hooks());
        let mut data = serde_json::to_value(&menu).map_err(internal("task_dropdown"))?;
        data["title"] = json!(task.title);
        Ok(Response::page("task/dropdown.html", data))
    }
}
