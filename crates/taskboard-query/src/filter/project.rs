//! Project filters.

use taskboard_model::models::{ProjectStatus, ProjectType};

use super::{any_of, Filter};
use crate::query::{Condition, Query};

/// Unfiltered project query.
pub fn project_query() -> Query {
    Query::new(
        "SELECT
            projects.id AS id,
            projects.name AS name,
            projects.description AS description,
            projects.is_active AS is_active,
            projects.is_private AS is_private,
            projects.owner_id AS owner_id,
            projects.start_date AS start_date,
            projects.end_date AS end_date,
            projects.default_filter AS default_filter,
            projects.last_modified AS last_modified
        FROM projects",
    )
}

/// Narrows the project query.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectFilter {
    Id(i64),
    /// Membership in a set; an empty set matches nothing.
    Ids(Vec<i64>),
    Status(ProjectStatus),
    Type(ProjectType),
    /// Case-insensitive substring of the name.
    Name(String),
    /// Matches if any inner filter matches; empty matches nothing.
    Any(Vec<ProjectFilter>),
}

impl Filter for ProjectFilter {
    fn base_query() -> Query {
        project_query()
    }

    fn condition(&self) -> Condition {
        match self {
            ProjectFilter::Id(id) => Condition::eq("projects.id", *id),
            ProjectFilter::Ids(ids) => Condition::in_ids("projects.id", ids),
            ProjectFilter::Status(status) => Condition::eq("projects.is_active", status.as_db()),
            ProjectFilter::Type(kind) => Condition::eq("projects.is_private", kind.as_db()),
            ProjectFilter::Name(name) => Condition::contains("projects.name", name),
            ProjectFilter::Any(filters) => any_of(filters),
        }
    }
}
