//! Output formatting utilities for the tb CLI.
//!
//! Controller responses go through [`emit`]; store listings have their own
//! table and JSON formatters, organized by entity:
//!
//! - [`categories`] - Category output formatting (list, show, add, rename, remove)
//! - [`projects`] - Project, user and member listings
//! - [`helpers`] - Common formatting utilities

mod categories;
pub mod helpers;
mod projects;

pub use categories::{
    format_categories_json, format_categories_table, format_category_change,
    format_category_json, format_category_table, CategoryChange,
};
pub use projects::{
    format_members_json, format_members_table, format_projects_json, format_projects_table,
    format_users_json, format_users_table,
};

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::app::App;
use crate::commands::{CommandContext, CommandError, Result};
use crate::response::{Flash, FlashLevel, Response};

/// JSON envelope of a controller response.
#[derive(Serialize)]
struct ResponseOutput<'a> {
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    data: &'a serde_json::Value,
    flashes: &'a [Flash],
}

/// Prints a controller response and the flash messages it queued.
///
/// # Errors
///
/// Returns [`CommandError::Rejected`] when the response carries an error
/// status, after printing it.
pub fn emit(ctx: &CommandContext, app: &App, response: &Response) -> Result<()> {
    let flashes = app.session().take_flashes();

    if ctx.json_output {
        let location = match response {
            Response::Redirect { location } => Some(location.as_str()),
            _ => None,
        };
        let output = ResponseOutput {
            status: response.status(),
            location,
            data: response.data(),
            flashes: &flashes,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for flash in &flashes {
            eprintln!("{}", format_flash(flash, ctx.use_colors));
        }
        if !ctx.quiet {
            match response {
                Response::Page { template, data, .. } => {
                    print!("{}", app.view().render(template, data)?);
                }
                Response::Json { body, .. } => {
                    let message = body.get("message").and_then(serde_json::Value::as_str);
                    match message {
                        Some(message) => println!("{message}"),
                        None => println!("{}", serde_json::to_string_pretty(body)?),
                    }
                }
                Response::Redirect { location } => println!("Redirect: {location}"),
            }
        }
    }

    if response.is_success() {
        Ok(())
    } else {
        Err(CommandError::Rejected(response.status()))
    }
}

/// Prints the response to a form submission.
///
/// A submission that renders its form again instead of redirecting was
/// rejected; that is an error once printed.
pub fn emit_submission(ctx: &CommandContext, app: &App, response: &Response) -> Result<()> {
    emit(ctx, app, response)?;
    match response {
        Response::Page { .. } => Err(CommandError::Rejected(400)),
        _ => Ok(()),
    }
}

/// Formats one flash message for the terminal.
pub fn format_flash(flash: &Flash, use_colors: bool) -> String {
    match (flash.level, use_colors) {
        (FlashLevel::Success, true) => flash.message.green().to_string(),
        (FlashLevel::Failure, true) => flash.message.red().to_string(),
        _ => flash.message.clone(),
    }
}
