//! Category output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskboard_model::models::Category;

use super::helpers::{header, truncate_str};

/// JSON output structure for categories list command.
#[derive(Serialize)]
pub struct CategoriesListOutput<'a> {
    pub project_id: i64,
    pub categories: &'a [Category],
}

/// Formats categories as JSON.
pub fn format_categories_json(project_id: i64, categories: &[Category]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CategoriesListOutput {
        project_id,
        categories,
    })
}

/// Formats categories as a table.
pub fn format_categories_table(categories: &[Category], use_colors: bool) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut output = header(&format!("{:<6} {:<30} {}", "ID", "Name", "Color"), use_colors);
    for category in categories {
        let line = format!(
            "{:<6} {:<30} {}",
            category.id,
            truncate_str(&category.name, 30),
            category.color_id.as_deref().unwrap_or("")
        );
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Formats one category as JSON.
pub fn format_category_json(category: &Category) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(category)
}

/// Formats one category as a detail view.
pub fn format_category_table(category: &Category, use_colors: bool) -> String {
    let name = if use_colors {
        category.name.bold().to_string()
    } else {
        category.name.clone()
    };
    let mut output = format!("{name}\n");
    output.push_str(&format!("  ID:      {}\n", category.id));
    output.push_str(&format!("  Project: {}\n", category.project_id));
    if let Some(color) = &category.color_id {
        output.push_str(&format!("  Color:   {color}\n"));
    }
    if !category.description.is_empty() {
        output.push_str(&format!("  {}\n", category.description));
    }
    output
}

/// Outcome of a category write.
#[derive(Debug, Serialize)]
pub struct CategoryChange<'a> {
    pub id: Option<i64>,
    pub name: Option<&'a str>,
    /// `created`, `renamed`, `removed` or `rejected`.
    pub status: &'static str,
}

/// Formats a category write as JSON or a one-line message.
pub fn format_category_change(change: &CategoryChange<'_>, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(change);
    }
    let subject = match (change.id, change.name) {
        (Some(id), Some(name)) => format!("category {id} ({name})"),
        (Some(id), None) => format!("category {id}"),
        (None, Some(name)) => format!("category '{name}'"),
        (None, None) => "category".to_string(),
    };
    Ok(match change.status {
        "rejected" => format!("Unable to save {subject}."),
        status => format!("{} {status}.", capitalize(&subject)),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
