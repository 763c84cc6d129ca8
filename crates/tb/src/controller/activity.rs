//! Activity feeds.

use serde_json::json;
use taskboard_model::prelude::*;
use taskboard_query::formatter::{ActivityEvent, ActivityEventFormatter};

use super::{get_project, get_task, internal, respond, Outcome};
use crate::app::App;
use crate::helper::ProjectActivityHelper;
use crate::response::Response;

pub struct ActivityController<'a> {
    app: &'a App,
}

impl<'a> ActivityController<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Events matching a search across the user's projects.
    pub fn search(&self, search: &str) -> Response {
        respond(self.try_search(search))
    }

    fn try_search(&self, search: &str) -> Outcome<Response> {
        let events = self
            .with_helper(|helper| helper.search_events(search))
            .map_err(internal("activity_search"))?;
        Ok(events_page(format!("Search in activity stream: {search}"), events))
    }

    /// Latest events of one project.
    pub fn project(&self, project_id: i64) -> Response {
        respond(self.try_project(project_id))
    }

    fn try_project(&self, project_id: i64) -> Outcome<Response> {
        let project = get_project(self.app, project_id)?;
        let limit = self.app.settings().activity_limit;
        let events = self
            .with_helper(|helper| helper.get_project_events(project.id, limit))
            .map_err(internal("activity_project"))?;
        Ok(events_page(format!("{} > Activity", project.name), events))
    }

    /// Latest events across projects; every visible project when `project_ids`
    /// is empty. Projects the user cannot see are dropped.
    pub fn projects(&self, project_ids: &[i64]) -> Response {
        respond(self.try_projects(project_ids))
    }

    fn try_projects(&self, project_ids: &[i64]) -> Outcome<Response> {
        let visible = self
            .app
            .permission()
            .projects_by_user(self.app.user().id)
            .map_err(internal("activity_projects"))?;
        let ids: Vec<i64> = if project_ids.is_empty() {
            visible.into_keys().collect()
        } else {
            project_ids
                .iter()
                .copied()
                .filter(|id| visible.contains_key(id))
                .collect()
        };

        let limit = self.app.settings().activity_limit;
        let events = self
            .with_helper(|helper| helper.get_projects_events(&ids, limit))
            .map_err(internal("activity_projects"))?;
        Ok(events_page("My activity stream".to_string(), events))
    }

    /// Every event of one task.
    pub fn task(&self, task_id: i64) -> Response {
        respond(self.try_task(task_id))
    }

    fn try_task(&self, task_id: i64) -> Outcome<Response> {
        let task = get_task(self.app, task_id)?;
        let events = self
            .with_helper(|helper| helper.get_task_events(task.id))
            .map_err(internal("activity_task"))?;
        Ok(events_page(format!("#{} {} > Activity", task.id, task.title), events))
    }

    fn with_helper<T>(&self, f: impl FnOnce(&ProjectActivityHelper<'_>) -> T) -> T {
        let permission = self.app.permission();
        let lexer = self.app.activity_lexer();
        let helper = ProjectActivityHelper::new(
            self.app.conn(),
            &permission,
            &lexer,
            ActivityEventFormatter::new(self.app.dates().clone()),
            self.app.user().id,
        );
        f(&helper)
    }
}

fn events_page(title: String, events: Vec<ActivityEvent>) -> Response {
    Response::page("activity/events.html", json!({ "title": title, "events": events }))
}
