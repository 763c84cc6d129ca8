//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tb CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// tb - Gantt charts, recurring tasks and activity feeds for a taskboard
#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print JSON instead of rendered pages and tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Database file (default: from config, else the platform data directory)
    #[arg(long, global = true, env = "TB_DB")]
    pub db: Option<PathBuf>,

    /// Act as this user (default: from config)
    #[arg(long, global = true, env = "TB_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database
    Init,

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage projects
    #[command(alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage project members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Manage task categories
    #[command(alias = "cat")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Gantt charts of projects and tasks
    #[command(alias = "g")]
    Gantt {
        #[command(subcommand)]
        command: GanttCommands,
    },

    /// Activity streams
    #[command(alias = "a")]
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },

    /// Recurrence settings of a task
    Recurrence {
        #[command(subcommand)]
        command: RecurrenceCommands,
    },

    /// Task actions
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a user
    Add {
        /// Login name
        username: String,

        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Make the user an application administrator
        #[arg(long)]
        admin: bool,
    },

    /// List users
    #[command(alias = "ls")]
    List,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a team project owned by the current user
    Add {
        /// Project name
        name: String,

        /// Planned start date
        #[arg(long)]
        start: Option<String>,

        /// Planned end date
        #[arg(long)]
        end: Option<String>,

        /// Default search of the project's Gantt chart
        #[arg(long)]
        filter: Option<String>,
    },

    /// List the projects the current user can see
    #[command(alias = "ls")]
    List,
}

/// Member subcommands
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a user to a project, or change their role
    Add {
        /// Project ID
        project_id: i64,

        /// Username of the new member
        username: String,

        /// Role in the project
        #[arg(long, value_enum, default_value = "member")]
        role: Role,
    },

    /// List the members of a project by role
    #[command(alias = "ls")]
    List {
        /// Project ID
        project_id: i64,
    },
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List the categories of a project
    #[command(alias = "ls")]
    List {
        /// Project ID
        project_id: i64,
    },

    /// Show one category
    #[command(alias = "get")]
    Show {
        /// Category ID
        category_id: i64,
    },

    /// Create a category
    #[command(alias = "create")]
    Add {
        /// Project ID
        project_id: i64,

        /// Category name
        name: String,
    },

    /// Rename a category
    #[command(alias = "update")]
    Rename {
        /// Category ID
        category_id: i64,

        /// New name
        name: String,
    },

    /// Remove a category and detach it from its tasks
    #[command(alias = "rm")]
    Remove {
        /// Category ID
        category_id: i64,
    },
}

/// Gantt subcommands
#[derive(Subcommand, Debug)]
pub enum GanttCommands {
    /// Chart of every active project
    Projects,

    /// Chart of the tasks of one project
    Project {
        /// Project ID
        project_id: i64,

        /// Task search (default: the project's default filter)
        #[arg(short, long)]
        search: Option<String>,

        /// Task order
        #[arg(long, value_enum, default_value = "board")]
        sort: SortMode,
    },

    /// Move the planned dates of a project
    #[command(alias = "save-project-date")]
    ProjectDates {
        /// Project ID
        project_id: i64,

        /// Start date
        start: String,

        /// End date
        end: String,
    },

    /// Move the start and due dates of a task
    #[command(alias = "save-task-date")]
    TaskDates {
        /// Project ID
        project_id: i64,

        /// Task ID
        task_id: i64,

        /// Start date
        start: String,

        /// Due date
        end: String,
    },

    /// Show the task creation form with its defaults
    TaskForm {
        /// Project ID
        project_id: i64,

        /// Prefill a field (repeatable, key=value)
        #[arg(long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
        fields: Vec<String>,
    },

    /// Create a task from the chart
    #[command(alias = "save-task")]
    AddTask {
        /// Project ID
        project_id: i64,

        /// Task title
        title: String,

        /// Other field (repeatable, key=value)
        #[arg(long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
        fields: Vec<String>,
    },
}

/// Activity subcommands
#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// Search events across your projects
    Search {
        /// Search expression (e.g. "status:open creator:me")
        query: String,
    },

    /// Latest events of a project
    Project {
        /// Project ID
        project_id: i64,
    },

    /// Latest events across projects (default: all of yours)
    Projects {
        /// Project IDs
        project_ids: Vec<i64>,
    },

    /// Every event of a task
    Task {
        /// Task ID
        task_id: i64,
    },
}

/// Recurrence subcommands
#[derive(Subcommand, Debug)]
pub enum RecurrenceCommands {
    /// Show the recurrence form of a task
    #[command(alias = "edit")]
    Show {
        /// Task ID
        task_id: i64,
    },

    /// Change recurrence fields
    #[command(alias = "update")]
    Set {
        /// Task ID
        task_id: i64,

        /// Recurrence field (repeatable, e.g. recurrence_factor=7)
        #[arg(long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append, required = true)]
        fields: Vec<String>,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Show the action menu of a task
    #[command(alias = "dropdown")]
    Menu {
        /// Task ID
        task_id: i64,
    },

    /// Set the start date to now
    Start {
        /// Task ID
        task_id: i64,
    },

    /// Close a task
    Close {
        /// Task ID
        task_id: i64,
    },

    /// Reopen a task
    Open {
        /// Task ID
        task_id: i64,
    },

    /// Remove a task
    #[command(alias = "rm")]
    Remove {
        /// Task ID
        task_id: i64,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. "user", "timezone", "hooks.task_form_defaults.color_id")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

/// Project role on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Manager,
    Member,
    Viewer,
}

/// Task order of the project chart
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    /// Column position, then position in the column
    Board,
    /// Start date, then creation date
    Date,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Board => "board",
            SortMode::Date => "date",
        }
    }
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
