//! Project model.

use serde::{Deserialize, Serialize};

use super::{ProjectStatus, ProjectType};

/// Search applied to project views when the user has not typed one.
pub const DEFAULT_PROJECT_FILTER: &str = "status:open";

/// A project (one board).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// The unique identifier for the project.
    pub id: i64,

    /// The name of the project.
    pub name: String,

    /// Free-form description (Markdown).
    #[serde(default)]
    pub description: String,

    /// Whether the project is active or archived.
    pub status: ProjectStatus,

    /// Team or private project.
    pub project_type: ProjectType,

    /// The user who created the project, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,

    /// Planned start date in `YYYY-MM-DD` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Planned end date in `YYYY-MM-DD` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Search used when a project view is opened without one.
    pub default_filter: String,

    /// Unix timestamp of the last modification.
    pub last_modified: i64,
}

impl Project {
    /// Returns true if the project is active.
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    /// Returns the search to use when none was given.
    pub fn search_or_default(&self) -> &str {
        if self.default_filter.trim().is_empty() {
            DEFAULT_PROJECT_FILTER
        } else {
            &self.default_filter
        }
    }
}

/// Fields accepted when creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub owner_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl NewProject {
    /// Creates an active team project with just a name.
    pub fn team(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            project_type: ProjectType::Team,
            status: ProjectStatus::Active,
            owner_id: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the owner.
    pub fn owned_by(mut self, user_id: i64) -> Self {
        self.owner_id = Some(user_id);
        self
    }
}
