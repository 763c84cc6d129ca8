//! Command implementations for the tb CLI.
//!
//! Each submodule turns one command group into controller or API calls and
//! hands the result to [`crate::output`].

pub mod activity;
pub mod category;
pub mod completions;
pub mod config;
pub mod gantt;
pub mod recurrence;
pub mod setup;
pub mod task;

use taskboard_model::error::StoreError;
use taskboard_model::values::Values;
use taskboard_query::filter::FilterError;
use taskboard_query::QueryError;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Database error.
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    /// Query execution error.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Search parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A named entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A controller answered with an error status.
    #[error("request failed with status {0}")]
    Rejected(u16),

    /// Template rendering error.
    #[error("render error: {0}")]
    Render(#[from] minijinja::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing output settings.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are off when `--no-color` is given, when `NO_COLOR` is set or
    /// when `[output] color = false` is configured.
    pub fn from_cli(cli: &Cli, config_color: Option<bool>) -> Self {
        let env_no_color = std::env::var_os("NO_COLOR").is_some();
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !env_no_color && config_color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// Parses repeated `key=value` arguments into form values.
pub fn parse_fields(fields: &[String]) -> Result<Values> {
    fields
        .iter()
        .map(|field| {
            field
                .split_once('=')
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| {
                    CommandError::Config(format!("Invalid field '{field}'. Use key=value"))
                })
        })
        .collect()
}
