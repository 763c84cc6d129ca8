//! Task category model.

use serde::{Deserialize, Serialize};

/// A category tasks of one project can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The unique identifier for the category.
    pub id: i64,

    /// Display name, unique within the project.
    pub name: String,

    /// The project the category belongs to.
    pub project_id: i64,

    /// Optional longer description.
    #[serde(default)]
    pub description: String,

    /// Optional color id from the palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
}

/// Fields accepted when creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub project_id: i64,
    pub name: String,
    pub description: String,
    pub color_id: Option<String>,
}

impl NewCategory {
    /// Creates a category with just a name.
    pub fn new(project_id: i64, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: String::new(),
            color_id: None,
        }
    }
}
