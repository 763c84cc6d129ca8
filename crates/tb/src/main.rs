use clap::Parser;
use std::process::ExitCode;

mod activity;
mod api;
mod app;
mod cli;
mod commands;
mod controller;
mod dispatch;
mod helper;
mod hook;
mod logging;
mod output;
mod response;
mod url;
mod view;

use app::{App, Settings};
use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{AppCommand, AppDispatch, NoAppCommand, NoAppDispatch};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let _logger = logging::init_logging(cli.verbose, cli.quiet).map_err(CommandError::Config)?;
    let ctx = CommandContext::from_cli(cli, config.output.color);
    let settings = Settings::resolve(cli.db.as_deref(), cli.user.as_deref(), &config)?;

    if let Some(dispatch) = NoAppDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx, &settings);
    }

    let Some(dispatch) = AppDispatch::from_cli(cli) else {
        return Err(CommandError::Config(format!("unsupported command: {:?}", cli.command)));
    };
    let app = App::open(settings)?;
    dispatch.execute(&ctx, &app)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Query(_) => "QUERY_ERROR",
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::NotFound(_) => "NOT_FOUND",
        CommandError::Rejected(_) => "REJECTED",
        CommandError::Render(_) => "RENDER_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Store(_) => ExitCode::from(5),
        CommandError::Query(_) => ExitCode::from(5),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Rejected(_) => ExitCode::from(2),
        CommandError::NotFound(_) => ExitCode::from(4),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Render(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
    }
}
