//! Database, user, project and membership setup.
//!
//! `init` and the user commands work without an acting user so that a fresh
//! database can be bootstrapped; the others act as the configured user.

use log::info;
use taskboard_model::prelude::*;

use super::{CommandContext, CommandError, Result};
use crate::app::{App, Settings};
use crate::cli::Role;
use crate::output::{
    format_members_json, format_members_table, format_projects_json, format_projects_table,
    format_users_json, format_users_table,
};

/// Creates (or migrates) the database.
pub fn execute_init(ctx: &CommandContext, settings: &Settings) -> Result<()> {
    open_db(&settings.database)?;
    info!("event=init module=setup status=ok path={}", settings.database.display());

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "initialized",
            "database": settings.database.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Database ready at {}", settings.database.display());
    }
    Ok(())
}

/// Options for the user add command.
#[derive(Debug)]
pub struct UserAddOptions {
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub admin: bool,
}

/// Creates a user.
///
/// # Errors
///
/// Returns a config error when the username is empty or already taken.
pub fn execute_user_add(ctx: &CommandContext, settings: &Settings, opts: &UserAddOptions) -> Result<()> {
    let username = opts.username.trim();
    if username.is_empty() {
        return Err(CommandError::Config("Username cannot be empty".to_string()));
    }

    let conn = open_db(&settings.database)?;
    let users = SqliteUserStore::new(&conn);
    if users.get_by_username(username)?.is_some() {
        return Err(CommandError::Config(format!("User '{username}' already exists")));
    }

    let mut new_user = NewUser::new(username);
    new_user.name = opts.name.clone().unwrap_or_default();
    new_user.email = opts.email.clone().unwrap_or_default();
    if opts.admin {
        new_user.role = UserRole::Admin;
    }
    let id = users.create(&new_user)?;
    info!("event=user_add module=setup status=ok user_id={id}");

    if ctx.json_output {
        let user = users
            .get_by_id(id)?
            .ok_or_else(|| CommandError::NotFound(format!("user {id}")))?;
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else if !ctx.quiet {
        println!("Created user {username} ({id})");
    }
    Ok(())
}

/// Lists every user.
pub fn execute_user_list(ctx: &CommandContext, settings: &Settings) -> Result<()> {
    let conn = open_db(&settings.database)?;
    let users = SqliteUserStore::new(&conn).get_all()?;

    if ctx.json_output {
        println!("{}", format_users_json(&users)?);
    } else if !ctx.quiet {
        print!("{}", format_users_table(&users, ctx.use_colors));
    }
    Ok(())
}

/// Options for the project add command.
#[derive(Debug, Default)]
pub struct ProjectAddOptions {
    pub name: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub filter: Option<String>,
}

/// Creates a team project owned by the acting user.
pub fn execute_project_add(ctx: &CommandContext, app: &App, opts: &ProjectAddOptions) -> Result<()> {
    let id = create_project(app, opts)?;

    if ctx.json_output {
        let project = app
            .projects()
            .get_by_id(id)?
            .ok_or_else(|| CommandError::NotFound(format!("project {id}")))?;
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else if !ctx.quiet {
        println!("Created project {} ({id})", opts.name.trim());
    }
    Ok(())
}

fn create_project(app: &App, opts: &ProjectAddOptions) -> Result<i64> {
    let name = opts.name.trim();
    if name.is_empty() {
        return Err(CommandError::Config("Project name cannot be empty".to_string()));
    }

    let dates = app.dates();
    let parse = |label: &str, value: &Option<String>| -> Result<Option<String>> {
        value
            .as_deref()
            .map(|text| {
                dates
                    .iso_date(text)
                    .ok_or_else(|| CommandError::Config(format!("Invalid {label} date '{text}'")))
            })
            .transpose()
    };

    let mut project = NewProject::team(name).owned_by(app.user().id);
    project.start_date = parse("start", &opts.start)?;
    project.end_date = parse("end", &opts.end)?;

    let projects = app.projects();
    let id = projects.create(&project)?;
    if let Some(filter) = opts.filter.as_deref().filter(|f| !f.trim().is_empty()) {
        projects.update(id, &Changes::new().set("default_filter", filter.trim().to_string()))?;
    }
    info!("event=project_add module=setup status=ok project_id={id}");
    Ok(id)
}

/// Lists the projects the acting user can see.
pub fn execute_project_list(ctx: &CommandContext, app: &App) -> Result<()> {
    let projects = visible_projects(app)?;

    if ctx.json_output {
        println!("{}", format_projects_json(&projects)?);
    } else if !ctx.quiet {
        print!("{}", format_projects_table(&projects, ctx.use_colors));
    }
    Ok(())
}

fn visible_projects(app: &App) -> Result<Vec<Project>> {
    let permission = app.permission();
    let mut projects = Vec::new();
    for project in app.projects().get_all()? {
        if permission.can_view(app.user(), project.id)? {
            projects.push(project);
        }
    }
    Ok(projects)
}

impl From<Role> for ProjectRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Manager => ProjectRole::Manager,
            Role::Member => ProjectRole::Member,
            Role::Viewer => ProjectRole::Viewer,
        }
    }
}

/// Adds a member to a project. Only managers and administrators may.
pub fn execute_member_add(
    ctx: &CommandContext,
    app: &App,
    project_id: i64,
    username: &str,
    role: Role,
) -> Result<()> {
    add_member(app, project_id, username, role.into())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "project_id": project_id,
            "username": username,
            "role": ProjectRole::from(role),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Added {username} to project {project_id} as {}", ProjectRole::from(role).as_str());
    }
    Ok(())
}

fn add_member(app: &App, project_id: i64, username: &str, role: ProjectRole) -> Result<()> {
    app.projects()
        .get_by_id(project_id)?
        .ok_or_else(|| CommandError::NotFound(format!("project {project_id}")))?;

    let permission = app.permission();
    let actor = app.user();
    if !actor.is_admin() && permission.role(project_id, actor.id)? != Some(ProjectRole::Manager) {
        return Err(CommandError::Rejected(403));
    }

    let user = app
        .users()
        .get_by_username(username)?
        .ok_or_else(|| CommandError::NotFound(format!("user '{username}'")))?;
    permission.add_user(project_id, user.id, role)?;
    info!(
        "event=member_add module=setup status=ok project_id={project_id} user_id={} role={}",
        user.id,
        role.as_str()
    );
    Ok(())
}

/// Lists project members grouped by role.
pub fn execute_member_list(ctx: &CommandContext, app: &App, project_id: i64) -> Result<()> {
    let permission = app.permission();
    if !permission.can_view(app.user(), project_id)? {
        return Err(CommandError::Rejected(403));
    }
    let members = permission.users_grouped_by_role(project_id)?;

    if ctx.json_output {
        println!("{}", format_members_json(project_id, &members)?);
    } else if !ctx.quiet {
        print!("{}", format_members_table(&members, ctx.use_colors));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{fixture, fixture_as};

    #[test]
    fn test_create_project_parses_dates_and_filter() {
        let fx = fixture();
        let opts = ProjectAddOptions {
            name: "  Launch ".to_string(),
            start: Some("2024/02/01".to_string()),
            end: Some("2024-03-01".to_string()),
            filter: Some("status:open assignee:me".to_string()),
        };
        let id = create_project(&fx.app, &opts).unwrap();

        let project = fx.app.projects().get_by_id(id).unwrap().unwrap();
        assert_eq!(project.name, "Launch");
        assert_eq!(project.start_date.as_deref(), Some("2024-02-01"));
        assert_eq!(project.default_filter, "status:open assignee:me");
        assert_eq!(
            fx.app.permission().role(id, fx.alice.id).unwrap(),
            Some(ProjectRole::Manager)
        );
    }

    #[test]
    fn test_create_project_rejects_bad_date() {
        let fx = fixture();
        let opts = ProjectAddOptions {
            name: "Launch".to_string(),
            start: Some("someday".to_string()),
            ..ProjectAddOptions::default()
        };
        assert!(matches!(create_project(&fx.app, &opts), Err(CommandError::Config(_))));
    }

    #[test]
    fn test_visible_projects() {
        let fx = fixture_as("bob", Settings::default());
        let names: Vec<String> = visible_projects(&fx.app)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Website"]);
    }

    #[test]
    fn test_add_member_requires_manager() {
        let fx = fixture_as("bob", Settings::default());
        assert!(matches!(
            add_member(&fx.app, fx.website, "bob", ProjectRole::Manager),
            Err(CommandError::Rejected(403))
        ));

        let fx = fixture();
        add_member(&fx.app, fx.secret, "bob", ProjectRole::Viewer).unwrap();
        assert_eq!(
            fx.app.permission().role(fx.secret, fx.bob.id).unwrap(),
            Some(ProjectRole::Viewer)
        );
        assert!(matches!(
            add_member(&fx.app, fx.secret, "nobody", ProjectRole::Member),
            Err(CommandError::NotFound(_))
        ));
    }
}
