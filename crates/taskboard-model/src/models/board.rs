//! Board structure: columns and swimlanes.

use serde::{Deserialize, Serialize};

/// Column titles created for every new project.
pub const DEFAULT_COLUMNS: [&str; 4] = ["Backlog", "Ready", "Work in progress", "Done"];

/// Name of the swimlane created for every new project.
pub const DEFAULT_SWIMLANE: &str = "Default swimlane";

/// A board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: i64,
    pub title: String,
    /// 1-based position from left to right.
    pub position: i64,
    pub project_id: i64,
}

/// A board swimlane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swimlane {
    pub id: i64,
    pub name: String,
    pub position: i64,
    pub is_active: bool,
    pub project_id: i64,
}
