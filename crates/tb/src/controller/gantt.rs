//! Gantt charts: all projects, and the tasks of one project.

use log::{info, warn};
use serde_json::{json, Value};
use taskboard_model::prelude::*;
use taskboard_query::filter::{ProjectFilter, SearchLexer, TaskFilter};
use taskboard_query::formatter::{ProjectGanttFormatter, TaskGanttFormatter};
use taskboard_query::QueryBuilder;

use super::{get_project, internal, json_id, json_text, require_edit, respond, Outcome};
use crate::activity::ActivityRecorder;
use crate::app::App;
use crate::hook::{GANTT_TASK_FORM_DEFAULT, TASK_FORM_DEFAULT};
use crate::response::Response;
use crate::view::choices;

const UNABLE_TO_SAVE_PROJECT: &str = "Unable to save project";
const UNABLE_TO_SAVE_TASK: &str = "Unable to save task";

/// Task ordering of the project chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sorting {
    /// Column position, then position within the column.
    #[default]
    Board,
    /// Start date, then creation date.
    Date,
}

impl Sorting {
    /// `date` selects date order; anything else is board order.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("date") => Sorting::Date,
            _ => Sorting::Board,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Sorting::Board => "board",
            Sorting::Date => "date",
        }
    }
}

pub struct GanttController<'a> {
    app: &'a App,
}

impl<'a> GanttController<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Chart of every active team project the user can see, by start date.
    pub fn projects(&self) -> Response {
        respond(self.try_projects())
    }

    fn try_projects(&self) -> Outcome<Response> {
        let permission = self.app.permission();
        let project_ids = permission
            .active_project_ids(self.app.user().id)
            .map_err(internal("gantt_projects"))?;

        let mut builder = QueryBuilder::new()
            .with_filter(ProjectFilter::Type(ProjectType::Team))
            .with_filter(ProjectFilter::Status(ProjectStatus::Active))
            .with_filter(ProjectFilter::Ids(project_ids));
        builder.query_mut().asc("projects.start_date");

        let formatter =
            ProjectGanttFormatter::new(&permission, self.app.urls(), self.app.dates().clone());
        let projects = builder
            .format(self.app.conn(), &formatter)
            .map_err(internal("gantt_projects"))?;

        Ok(Response::page(
            "gantt/projects.html",
            json!({
                "title": "Gantt chart for all projects",
                "projects": projects,
            }),
        ))
    }

    /// Saves the planned dates of a project from `{"id", "start", "end"}`.
    pub fn save_project_date(&self, body: &Value) -> Response {
        respond(self.try_save_project_date(body))
    }

    fn try_save_project_date(&self, body: &Value) -> Outcome<Response> {
        let unable = || Response::message(400, UNABLE_TO_SAVE_PROJECT);

        let project_id = json_id(body, "id").ok_or_else(unable)?;
        let project = get_project(self.app, project_id)?;
        require_edit(self.app, project.id)?;

        let dates = self.app.dates();
        let (Some(start), Some(end)) = (
            json_text(body, "start").and_then(|s| dates.iso_date(s)),
            json_text(body, "end").and_then(|s| dates.iso_date(s)),
        ) else {
            warn!("event=gantt_save_project_date module=controller status=invalid project_id={project_id}");
            return Err(unable());
        };

        let changes = Changes::new().set("start_date", start).set("end_date", end);
        match self.app.projects().update(project.id, &changes) {
            Ok(true) => {
                info!("event=gantt_save_project_date module=controller status=ok project_id={project_id}");
                Ok(Response::message(201, "OK"))
            }
            Ok(false) => Err(unable()),
            Err(err) => {
                warn!("event=gantt_save_project_date module=controller status=error project_id={project_id} error={err}");
                Err(unable())
            }
        }
    }

    /// Chart of the project's tasks matching `search`.
    ///
    /// Without a search the project's default filter applies. A search that
    /// does not parse shows no task.
    pub fn project(&self, project_id: i64, search: Option<&str>, sorting: Option<&str>) -> Response {
        respond(self.try_project(project_id, search, sorting))
    }

    fn try_project(&self, project_id: i64, search: Option<&str>, sorting: Option<&str>) -> Outcome<Response> {
        let project = get_project(self.app, project_id)?;
        let search = search
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| project.search_or_default())
            .to_string();
        let sorting = Sorting::parse(sorting);

        let lexer = self.app.task_lexer();
        let (builder, search_error) = match SearchLexer::build(&lexer, &search) {
            Ok(builder) => (builder, None),
            Err(err) => {
                warn!("event=gantt_search module=controller status=invalid project_id={project_id} error={err}");
                (QueryBuilder::new().with_filter(TaskFilter::Any(Vec::new())), Some(err.to_string()))
            }
        };
        let mut builder = builder.with_filter(TaskFilter::Project(project.id));
        match sorting {
            Sorting::Date => builder
                .query_mut()
                .asc("tasks.date_started")
                .asc("tasks.date_creation"),
            Sorting::Board => builder.query_mut().asc("columns.position").asc("tasks.position"),
        };

        let board = self.app.board();
        let formatter = TaskGanttFormatter::new(&board, self.app.urls(), self.app.dates().clone());
        let tasks = builder
            .format(self.app.conn(), &formatter)
            .map_err(internal("gantt_project"))?;

        Ok(Response::page(
            "gantt/project.html",
            json!({
                "title": project.name,
                "project": project,
                "search": search,
                "sorting": sorting.as_str(),
                "search_error": search_error,
                "tasks": tasks,
            }),
        ))
    }

    /// Saves the start and due dates of a task from `{"id", "start", "end"}`.
    pub fn save_task_date(&self, project_id: i64, body: &Value) -> Response {
        respond(self.try_save_task_date(project_id, body))
    }

    fn try_save_task_date(&self, project_id: i64, body: &Value) -> Outcome<Response> {
        let unable = || Response::message(400, UNABLE_TO_SAVE_TASK);

        let project = get_project(self.app, project_id)?;
        require_edit(self.app, project.id)?;

        let tasks = self.app.tasks();
        let task_id = json_id(body, "id").ok_or_else(unable)?;
        let task = tasks
            .get_by_id(task_id)
            .map_err(internal("gantt_save_task_date"))?
            .filter(|task| task.project_id == project.id)
            .ok_or_else(unable)?;

        let dates = self.app.dates();
        let (Some(started), Some(due)) = (
            json_text(body, "start").and_then(|s| dates.parse_timestamp(s)),
            json_text(body, "end").and_then(|s| dates.parse_timestamp(s)),
        ) else {
            warn!("event=gantt_save_task_date module=controller status=invalid task_id={task_id}");
            return Err(unable());
        };

        let changes = Changes::new()
            .set("date_started", started)
            .set("date_due", due)
            .set("date_modification", dates.now_timestamp());
        match tasks.update(task.id, &changes) {
            Ok(true) => {
                if let Ok(Some(updated)) = tasks.get_by_id(task.id) {
                    let store = self.app.activities();
                    ActivityRecorder::new(&store, self.app.user().id)
                        .task_event(events::TASK_UPDATE, &updated);
                }
                info!("event=gantt_save_task_date module=controller status=ok task_id={task_id}");
                Ok(Response::message(201, "OK"))
            }
            Ok(false) => Err(unable()),
            Err(err) => {
                warn!("event=gantt_save_task_date module=controller status=error task_id={task_id} error={err}");
                Err(unable())
            }
        }
    }

    /// Task creation form, prefilled with the project defaults and whatever
    /// the hooks contribute.
    pub fn task_form(&self, project_id: i64, values: Values, errors: ValidationErrors) -> Response {
        respond(self.try_task_form(project_id, values, errors))
    }

    fn try_task_form(&self, project_id: i64, mut values: Values, errors: ValidationErrors) -> Outcome<Response> {
        let project = get_project(self.app, project_id)?;
        let board = self.app.board();

        let first_column = board
            .first_column_id(project.id)
            .map_err(internal("gantt_task_form"))?
            .unwrap_or_default();
        let first_swimlane = board
            .first_swimlane_id(project.id)
            .map_err(internal("gantt_task_form"))?
            .unwrap_or_default();
        values.insert_default("project_id", project.id);
        values.insert_default("column_id", first_column);
        values.insert_default("swimlane_id", first_swimlane);
        values.insert_default("position", 1);
        values.insert_default("color_id", self.app.default_color());

        let hooks = self.app.hooks();
        let context = values.clone();
        let values = hooks.merge(TASK_FORM_DEFAULT, values, &context);
        let context = values.clone();
        let values = hooks.merge(GANTT_TASK_FORM_DEFAULT, values, &context);

        let users = self
            .app
            .permission()
            .assignable_users(project.id)
            .map_err(internal("gantt_task_form"))?;
        let categories = self
            .app
            .categories()
            .get_list(project.id)
            .map_err(internal("gantt_task_form"))?;
        let swimlanes = board
            .swimlanes(project.id, true)
            .map_err(internal("gantt_task_form"))?;

        let users_list = choices(
            std::iter::once((0, "Unassigned".to_string())).chain(users),
        );
        let categories_list = choices(
            std::iter::once((0, "No category".to_string())).chain(categories),
        );
        let swimlanes_list = choices(swimlanes.into_iter().map(|s| (s.id, s.name)));
        let colors_list = choices(ColorPalette.list());

        Ok(Response::page(
            "gantt/task_creation.html",
            json!({
                "title": format!("{} > New task", project.name),
                "project": project,
                "values": values,
                "errors": errors,
                "action": self.app.urls().to(
                    "GanttController",
                    "saveTask",
                    &[("project_id", project.id.to_string())],
                ),
                "users_list": users_list,
                "categories_list": categories_list,
                "swimlanes_list": swimlanes_list,
                "colors_list": colors_list,
            }),
        ))
    }

    /// Validates and creates a task, then returns to the project chart.
    pub fn save_task(&self, project_id: i64, values: Values) -> Response {
        respond(self.try_save_task(project_id, values))
    }

    fn try_save_task(&self, project_id: i64, mut values: Values) -> Outcome<Response> {
        let project = get_project(self.app, project_id)?;
        require_edit(self.app, project.id)?;

        values.insert("project_id", project.id);
        values.insert("creator_id", self.app.user().id);

        if let Err(errors) = self.app.task_validator().validate_creation(&values) {
            info!("event=gantt_save_task module=controller status=invalid project_id={project_id}");
            return Ok(self.task_form(project.id, values, errors));
        }

        let new_task = new_task_from_values(&values, self.app.dates(), self.app.default_color());
        let tasks = self.app.tasks();
        match tasks.create(&new_task) {
            Ok(task_id) => {
                if let Ok(Some(task)) = tasks.get_by_id(task_id) {
                    let store = self.app.activities();
                    ActivityRecorder::new(&store, self.app.user().id)
                        .task_event(events::TASK_CREATE, &task);
                }
                info!("event=gantt_save_task module=controller status=ok task_id={task_id}");
                self.app.session().success("Task created successfully.");
                Ok(Response::redirect(self.app.urls().to(
                    "GanttController",
                    "project",
                    &[("project_id", project.id.to_string())],
                )))
            }
            Err(err) => {
                warn!("event=gantt_save_task module=controller status=error project_id={project_id} error={err}");
                self.app.session().failure("Unable to create your task.");
                Ok(self.task_form(project.id, values, ValidationErrors::new()))
            }
        }
    }
}

/// Converts validated form values into store input.
fn new_task_from_values(values: &Values, dates: &DateParser, default_color: &str) -> NewTask {
    let mut task = NewTask::new(
        values.int("project_id").unwrap_or_default(),
        values.text("title").unwrap_or_default(),
    );
    task.description = values.get("description").unwrap_or_default().to_string();
    task.column_id = values.id("column_id");
    task.swimlane_id = values.id("swimlane_id");
    task.owner_id = values.id("owner_id");
    task.creator_id = values.id("creator_id");
    task.category_id = values.id("category_id");
    task.color_id = Some(values.text("color_id").unwrap_or(default_color).to_string());
    task.priority = values.int("priority").unwrap_or_default();
    task.reference = values.text("reference").unwrap_or_default().to_string();
    task.date_started = values.text("date_started").and_then(|d| dates.parse_timestamp(d));
    task.date_due = values.text("date_due").and_then(|d| dates.parse_timestamp(d));
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{fixture, fixture_as};
    use crate::app::Settings;
    use crate::response::FlashLevel;

    #[test]
    fn test_projects_lists_visible_active_team_projects() {
        let fx = fixture_as("bob", Settings::default());
        let response = GanttController::new(&fx.app).projects();

        assert_eq!(response.status(), 200);
        let data = response.data();
        assert_eq!(data["title"], "Gantt chart for all projects");
        let titles: Vec<&str> = data["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Website"]);
    }

    #[test]
    fn test_projects_skips_archived() {
        let fx = fixture();
        fx.app
            .projects()
            .update(fx.secret, &Changes::new().set("is_active", 0))
            .unwrap();
        let response = GanttController::new(&fx.app).projects();
        assert_eq!(response.data()["projects"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_save_project_date() {
        let fx = fixture();
        let controller = GanttController::new(&fx.app);

        let response = controller.save_project_date(&json!({
            "id": fx.website, "start": "2024-02-01", "end": "2024/03/15"
        }));
        assert_eq!(response, Response::message(201, "OK"));

        let project = fx.app.projects().get_by_id(fx.website).unwrap().unwrap();
        assert_eq!(project.start_date.as_deref(), Some("2024-02-01"));
        assert_eq!(project.end_date.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn test_save_project_date_rejects_bad_dates() {
        let fx = fixture();
        let controller = GanttController::new(&fx.app);

        let response = controller.save_project_date(&json!({
            "id": fx.website, "start": "not a date", "end": "2024-03-15"
        }));
        assert_eq!(response, Response::message(400, "Unable to save project"));

        let response = controller.save_project_date(&json!({ "start": "2024-01-01" }));
        assert_eq!(response.status(), 400);

        let project = fx.app.projects().get_by_id(fx.website).unwrap().unwrap();
        assert_eq!(project.start_date, None);
    }

    #[test]
    fn test_save_project_date_requires_edit_role() {
        let fx = fixture_as("bob", Settings::default());
        let response = GanttController::new(&fx.app).save_project_date(&json!({
            "id": fx.secret, "start": "2024-02-01", "end": "2024-03-01"
        }));
        assert_eq!(response.status(), 403);
    }

    #[test]
    fn test_project_uses_default_filter_and_board_order() {
        let fx = fixture();
        let first = fx.task(fx.website, "First");
        let second = fx.task(fx.website, "Second");
        fx.task(fx.secret, "Elsewhere");
        fx.app
            .tasks()
            .update(second.id, &Changes::new().set("is_active", 0))
            .unwrap();

        let response = GanttController::new(&fx.app).project(fx.website, None, None);
        let data = response.data();
        assert_eq!(data["search"], "status:open");
        assert_eq!(data["sorting"], "board");
        let ids: Vec<i64> = data["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [first.id]);
    }

    #[test]
    fn test_project_date_sorting() {
        let fx = fixture();
        let late = fx.task(fx.website, "Late");
        let early = fx.task(fx.website, "Early");
        let tasks = fx.app.tasks();
        tasks
            .update(late.id, &Changes::new().set("date_started", 1_710_000_000))
            .unwrap();
        tasks
            .update(early.id, &Changes::new().set("date_started", 1_700_000_000))
            .unwrap();

        let response = GanttController::new(&fx.app).project(fx.website, Some("status:open"), Some("date"));
        let ids: Vec<i64> = response.data()["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [early.id, late.id]);
    }

    #[test]
    fn test_project_invalid_search_shows_nothing() {
        let fx = fixture();
        fx.task(fx.website, "First");

        let response = GanttController::new(&fx.app).project(fx.website, Some("status:maybe"), None);
        assert_eq!(response.status(), 200);
        assert!(response.data()["tasks"].as_array().unwrap().is_empty());
        assert!(response.data()["search_error"].as_str().unwrap().contains("status"));
    }

    #[test]
    fn test_save_task_date() {
        let fx = fixture();
        let task = fx.task(fx.website, "Release");
        let controller = GanttController::new(&fx.app);

        let response = controller.save_task_date(
            fx.website,
            &json!({ "id": task.id, "start": "2024-01-10", "end": "2024-01-20" }),
        );
        assert_eq!(response.status(), 201);

        let saved = fx.app.tasks().get_by_id(task.id).unwrap().unwrap();
        assert_eq!(saved.date_started, Some(1_704_844_800));
        assert_eq!(saved.date_due, Some(1_705_708_800));
    }

    #[test]
    fn test_save_task_date_rejects_other_project_and_bad_dates() {
        let fx = fixture();
        let task = fx.task(fx.secret, "Hidden");
        let controller = GanttController::new(&fx.app);

        let response = controller.save_task_date(
            fx.website,
            &json!({ "id": task.id, "start": "2024-01-10", "end": "2024-01-20" }),
        );
        assert_eq!(response, Response::message(400, "Unable to save task"));

        let response = controller.save_task_date(
            fx.secret,
            &json!({ "id": task.id, "start": "2024-01-10", "end": "soon" }),
        );
        assert_eq!(response.status(), 400);
        let saved = fx.app.tasks().get_by_id(task.id).unwrap().unwrap();
        assert_eq!(saved.date_due, None);
    }

    #[test]
    fn test_task_form_defaults_and_hooks() {
        let mut fx = fixture();
        fx.app.hooks_mut().on_merge(TASK_FORM_DEFAULT, |_| Values::new().with("color_id", "red"));
        fx.app
            .hooks_mut()
            .on_merge(GANTT_TASK_FORM_DEFAULT, |ctx| {
                Values::new().with("title", format!("From {}", ctx.get("color_id").unwrap_or("?")))
            });

        let response = GanttController::new(&fx.app).task_form(fx.website, Values::new(), ValidationErrors::new());
        let data = response.data();
        let first_column = fx.app.board().first_column_id(fx.website).unwrap().unwrap();

        assert_eq!(data["title"], "Website > New task");
        assert_eq!(data["values"]["project_id"], fx.website.to_string());
        assert_eq!(data["values"]["column_id"], first_column.to_string());
        assert_eq!(data["values"]["position"], "1");
        assert_eq!(data["values"]["color_id"], "red");
        assert_eq!(data["values"]["title"], "From red");
        assert_eq!(data["users_list"][0]["label"], "Unassigned");
        assert_eq!(data["users_list"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_task_form_keeps_submitted_values() {
        let fx = fixture();
        let values = Values::new().with("position", 4).with("title", "Draft");
        let response = GanttController::new(&fx.app).task_form(fx.website, values, ValidationErrors::new());
        assert_eq!(response.data()["values"]["position"], "4");
        assert_eq!(response.data()["values"]["title"], "Draft");
    }

    #[test]
    fn test_save_task_creates_and_redirects() {
        let fx = fixture();
        let controller = GanttController::new(&fx.app);
        let values = Values::new()
            .with("title", "Ship it")
            .with("project_id", fx.secret)
            .with("date_due", "2024-05-01");

        let response = controller.save_task(fx.website, values);
        assert_eq!(
            response,
            Response::redirect(format!("/?controller=GanttController&action=project&project_id={}", fx.website))
        );
        let flashes = fx.app.session().take_flashes();
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[0].message, "Task created successfully.");

        let tasks = fx.app.tasks().get_all(fx.website).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Ship it");
        assert_eq!(tasks[0].creator_id, Some(fx.alice.id));
        assert!(tasks[0].date_due.is_some());
    }

    #[test]
    fn test_project_chart_link_matches_save_task_redirect() {
        let fx = fixture();
        let controller = GanttController::new(&fx.app);
        let chart = controller.projects();
        let website = chart.data()["projects"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == fx.website)
            .unwrap()
            .clone();

        let response = controller.save_task(fx.website, Values::new().with("title", "Ship it"));
        assert_eq!(response, Response::redirect(website["gantt_link"].as_str().unwrap()));
    }

    #[test]
    fn test_save_task_invalid_rerenders_form() {
        let fx = fixture();
        let response = GanttController::new(&fx.app).save_task(fx.website, Values::new().with("title", ""));

        assert_eq!(response.status(), 200);
        assert!(matches!(response, Response::Page { template: "gantt/task_creation.html", .. }));
        assert_eq!(response.data()["errors"]["title"][0], "The title is required");
        assert!(fx.app.tasks().get_all(fx.website).unwrap().is_empty());
    }
}
