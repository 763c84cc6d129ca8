//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands are split by what they need: some run without an acting user
//! (configuration, completions, bootstrapping the database and its users),
//! the rest need an [`App`] opened for the configured user.

use crate::app::{App, Settings};
use crate::cli::{
    ActivityCommands, CategoryCommands, Cli, Commands, ConfigCommands, GanttCommands,
    MemberCommands, ProjectCommands, RecurrenceCommands, TaskCommands, UserCommands,
};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without an acting user.
pub trait NoAppCommand {
    /// Execute the command with the resolved settings.
    fn execute(&self, ctx: &CommandContext, settings: &Settings) -> Result<()>;
}

/// Trait for commands that act as the configured user.
pub trait AppCommand {
    /// Execute the command against an open application.
    fn execute(&self, ctx: &CommandContext, app: &App) -> Result<()>;
}

/// Commands that don't need an acting user.
pub enum NoAppDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a crate::cli::Shell),
    Init,
    UserAdd(commands::setup::UserAddOptions),
    UserList,
    Help,
}

impl<'a> NoAppDispatch<'a> {
    /// Try to create a no-app dispatch from the CLI command.
    /// Returns None if the command needs an acting user.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Init) => Some(Self::Init),
            Some(Commands::User {
                command:
                    UserCommands::Add {
                        username,
                        name,
                        email,
                        admin,
                    },
            }) => Some(Self::UserAdd(commands::setup::UserAddOptions {
                username: username.clone(),
                name: name.clone(),
                email: email.clone(),
                admin: *admin,
            })),
            Some(Commands::User {
                command: UserCommands::List,
            }) => Some(Self::UserList),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl NoAppCommand for NoAppDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, settings: &Settings) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Init => commands::setup::execute_init(ctx, settings),
            Self::UserAdd(opts) => commands::setup::execute_user_add(ctx, settings, opts),
            Self::UserList => commands::setup::execute_user_list(ctx, settings),
            Self::Help => {
                if !ctx.quiet {
                    println!("tb - taskboard CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that act as the configured user.
pub enum AppDispatch<'a> {
    Project(&'a ProjectCommands),
    Member(&'a MemberCommands),
    Category(&'a CategoryCommands),
    Gantt(&'a GanttCommands),
    Activity(&'a ActivityCommands),
    Recurrence(&'a RecurrenceCommands),
    Task(&'a TaskCommands),
}

impl<'a> AppDispatch<'a> {
    /// Create an app dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Project { command }) => Some(Self::Project(command)),
            Some(Commands::Member { command }) => Some(Self::Member(command)),
            Some(Commands::Category { command }) => Some(Self::Category(command)),
            Some(Commands::Gantt { command }) => Some(Self::Gantt(command)),
            Some(Commands::Activity { command }) => Some(Self::Activity(command)),
            Some(Commands::Recurrence { command }) => Some(Self::Recurrence(command)),
            Some(Commands::Task { command }) => Some(Self::Task(command)),
            _ => None,
        }
    }
}

impl AppCommand for AppDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, app: &App) -> Result<()> {
        match self {
            Self::Project(command) => dispatch_project(ctx, app, command),
            Self::Member(command) => dispatch_member(ctx, app, command),
            Self::Category(command) => dispatch_category(ctx, app, command),
            Self::Gantt(command) => dispatch_gantt(ctx, app, command),
            Self::Activity(command) => dispatch_activity(ctx, app, command),
            Self::Recurrence(command) => dispatch_recurrence(ctx, app, command),
            Self::Task(command) => dispatch_task(ctx, app, command),
        }
    }
}

fn dispatch_project(ctx: &CommandContext, app: &App, command: &ProjectCommands) -> Result<()> {
    match command {
        ProjectCommands::Add {
            name,
            start,
            end,
            filter,
        } => {
            let opts = commands::setup::ProjectAddOptions {
                name: name.clone(),
                start: start.clone(),
                end: end.clone(),
                filter: filter.clone(),
            };
            commands::setup::execute_project_add(ctx, app, &opts)
        }
        ProjectCommands::List => commands::setup::execute_project_list(ctx, app),
    }
}

fn dispatch_member(ctx: &CommandContext, app: &App, command: &MemberCommands) -> Result<()> {
    match command {
        MemberCommands::Add {
            project_id,
            username,
            role,
        } => commands::setup::execute_member_add(ctx, app, *project_id, username, *role),
        MemberCommands::List { project_id } => {
            commands::setup::execute_member_list(ctx, app, *project_id)
        }
    }
}

fn dispatch_category(ctx: &CommandContext, app: &App, command: &CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List { project_id } => {
            commands::category::execute_list(ctx, app, *project_id)
        }
        CategoryCommands::Show { category_id } => {
            commands::category::execute_show(ctx, app, *category_id)
        }
        CategoryCommands::Add { project_id, name } => {
            commands::category::execute_add(ctx, app, *project_id, name)
        }
        CategoryCommands::Rename { category_id, name } => {
            commands::category::execute_rename(ctx, app, *category_id, name)
        }
        CategoryCommands::Remove { category_id } => {
            commands::category::execute_remove(ctx, app, *category_id)
        }
    }
}

fn dispatch_gantt(ctx: &CommandContext, app: &App, command: &GanttCommands) -> Result<()> {
    match command {
        GanttCommands::Projects => commands::gantt::execute_projects(ctx, app),
        GanttCommands::Project {
            project_id,
            search,
            sort,
        } => commands::gantt::execute_project(ctx, app, *project_id, search.as_deref(), *sort),
        GanttCommands::ProjectDates {
            project_id,
            start,
            end,
        } => commands::gantt::execute_project_dates(ctx, app, *project_id, start, end),
        GanttCommands::TaskDates {
            project_id,
            task_id,
            start,
            end,
        } => commands::gantt::execute_task_dates(ctx, app, *project_id, *task_id, start, end),
        GanttCommands::TaskForm { project_id, fields } => {
            commands::gantt::execute_task_form(ctx, app, *project_id, fields)
        }
        GanttCommands::AddTask {
            project_id,
            title,
            fields,
        } => commands::gantt::execute_add_task(ctx, app, *project_id, title, fields),
    }
}

fn dispatch_activity(ctx: &CommandContext, app: &App, command: &ActivityCommands) -> Result<()> {
    match command {
        ActivityCommands::Search { query } => commands::activity::execute_search(ctx, app, query),
        ActivityCommands::Project { project_id } => {
            commands::activity::execute_project(ctx, app, *project_id)
        }
        ActivityCommands::Projects { project_ids } => {
            commands::activity::execute_projects(ctx, app, project_ids)
        }
        ActivityCommands::Task { task_id } => commands::activity::execute_task(ctx, app, *task_id),
    }
}

fn dispatch_recurrence(ctx: &CommandContext, app: &App, command: &RecurrenceCommands) -> Result<()> {
    match command {
        RecurrenceCommands::Show { task_id } => {
            commands::recurrence::execute_show(ctx, app, *task_id)
        }
        RecurrenceCommands::Set { task_id, fields } => {
            commands::recurrence::execute_set(ctx, app, *task_id, fields)
        }
    }
}

fn dispatch_task(ctx: &CommandContext, app: &App, command: &TaskCommands) -> Result<()> {
    match command {
        TaskCommands::Menu { task_id } => commands::task::execute_menu(ctx, app, *task_id),
        TaskCommands::Start { task_id } => commands::task::execute_start(ctx, app, *task_id),
        TaskCommands::Close { task_id } => commands::task::execute_close(ctx, app, *task_id),
        TaskCommands::Open { task_id } => commands::task::execute_open(ctx, app, *task_id),
        TaskCommands::Remove { task_id } => commands::task::execute_remove(ctx, app, *task_id),
    }
}
