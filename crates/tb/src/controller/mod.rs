//! Controllers.
//!
//! A controller action takes already-parsed input, talks to the stores and
//! the query pipeline through the [`App`], and answers with a [`Response`].
//! Lower-level errors never escape an action: they are logged and turned into
//! an error page or an error payload.

pub mod activity;
pub mod gantt;
pub mod task_recurrence;
pub mod task_status;
pub mod task_view;

use std::fmt::Display;

use log::error;
use serde_json::Value;
use taskboard_model::prelude::*;

use crate::app::App;
use crate::response::Response;

/// Early return of an action.
pub(crate) type Outcome<T> = Result<T, Response>;

/// Collapses an action body into its response.
pub(crate) fn respond(outcome: Outcome<Response>) -> Response {
    outcome.unwrap_or_else(|response| response)
}

/// Logs an unexpected failure and maps it to the internal error page.
pub(crate) fn internal<E: Display>(action: &str) -> impl FnOnce(E) -> Response + '_ {
    move |err| {
        error!("event={action} module=controller status=error error={err}");
        Response::internal_error("The request could not be completed")
    }
}

/// Loads a project the acting user may view.
pub(crate) fn get_project(app: &App, project_id: i64) -> Outcome<Project> {
    let project = app
        .projects()
        .get_by_id(project_id)
        .map_err(internal("get_project"))?
        .ok_or_else(Response::not_found)?;

    if !app
        .permission()
        .can_view(app.user(), project.id)
        .map_err(internal("get_project"))?
    {
        return Err(Response::forbidden());
    }
    Ok(project)
}

/// Loads a task the acting user may view.
pub(crate) fn get_task(app: &App, task_id: i64) -> Outcome<Task> {
    let task = app
        .tasks()
        .get_by_id(task_id)
        .map_err(internal("get_task"))?
        .ok_or_else(Response::not_found)?;

    if !app
        .permission()
        .can_view(app.user(), task.project_id)
        .map_err(internal("get_task"))?
    {
        return Err(Response::forbidden());
    }
    Ok(task)
}

/// Fails with 403 unless the acting user may modify the project.
pub(crate) fn require_edit(app: &App, project_id: i64) -> Outcome<()> {
    if app
        .permission()
        .can_edit(app.user(), project_id)
        .map_err(internal("require_edit"))?
    {
        Ok(())
    } else {
        Err(Response::forbidden())
    }
}

/// Reads an id from a JSON body, accepting numbers and numeric strings.
pub(crate) fn json_id(body: &Value, field: &str) -> Option<i64> {
    match body.get(field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}

/// Reads a string field from a JSON body.
pub(crate) fn json_text<'v>(body: &'v Value, field: &str) -> Option<&'v str> {
    body.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{fixture, fixture_as};
    use crate::app::Settings;
    use serde_json::json;

    #[test]
    fn test_get_project_statuses() {
        let fx = fixture_as("bob", Settings::default());
        assert!(get_project(&fx.app, fx.website).is_ok());
        assert_eq!(get_project(&fx.app, fx.secret).unwrap_err().status(), 403);
        assert_eq!(get_project(&fx.app, 999).unwrap_err().status(), 404);
    }

    #[test]
    fn test_get_task_checks_project() {
        let fx = fixture();
        let task = fx.task(fx.secret, "Hidden");
        assert!(get_task(&fx.app, task.id).is_ok());

        let bob = fixture_as("bob", Settings::default());
        let hidden = bob.task(bob.secret, "Hidden");
        assert_eq!(get_task(&bob.app, hidden.id).unwrap_err().status(), 403);
    }

    #[test]
    fn test_json_fields() {
        let body = json!({ "id": "7", "other": 3, "start": "2024-01-01", "zero": 0 });
        assert_eq!(json_id(&body, "id"), Some(7));
        assert_eq!(json_id(&body, "other"), Some(3));
        assert_eq!(json_id(&body, "zero"), None);
        assert_eq!(json_id(&body, "missing"), None);
        assert_eq!(json_text(&body, "start"), Some("2024-01-01"));
        assert_eq!(json_text(&body, "other"), None);
    }
}
