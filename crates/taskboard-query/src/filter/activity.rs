//! Activity event filters and the activity search lexer.

use log::debug;
use taskboard_model::date::DateParser;
use taskboard_model::models::TaskStatus;

use super::lexer::{group_by_key, warn_unknown_attribute, Lexer, SearchToken};
use super::{any_of, parse_id, DateMatch, Filter, FilterError, FilterResult};
use crate::builder::QueryBuilder;
use crate::query::{Condition, Query};

/// Unfiltered activity query, joined with the author, task and project.
pub fn activity_query() -> Query {
    Query::new(
        "SELECT
            project_activities.id AS id,
            project_activities.date_creation AS date_creation,
            project_activities.event_name AS event_name,
            project_activities.creator_id AS creator_id,
            project_activities.project_id AS project_id,
            project_activities.task_id AS task_id,
            project_activities.data AS data,
            users.username AS author_username,
            users.name AS author_name,
            users.email AS author_email,
            tasks.title AS task_title,
            tasks.is_active AS task_is_active,
            projects.name AS project_name
        FROM project_activities
        LEFT JOIN users ON users.id = project_activities.creator_id
        LEFT JOIN tasks ON tasks.id = project_activities.task_id
        LEFT JOIN projects ON projects.id = project_activities.project_id",
    )
}

/// Event author selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorMatch {
    User(i64),
    /// Substring of the username or full name.
    Name(String),
}

/// Narrows the activity query.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityFilter {
    ProjectId(i64),
    /// Membership in a set of projects; an empty set matches nothing.
    ProjectIds(Vec<i64>),
    TaskId(i64),
    /// Substring of the task title; `#123` or `123` also matches the task id.
    TaskTitle(String),
    Creator(CreatorMatch),
    Created(DateMatch),
    TaskStatus(TaskStatus),
    ProjectName(String),
    /// Matches if any inner filter matches; empty matches nothing.
    Any(Vec<ActivityFilter>),
}

impl Filter for ActivityFilter {
    fn base_query() -> Query {
        activity_query()
    }

    fn condition(&self) -> Condition {
        match self {
            ActivityFilter::ProjectId(id) => Condition::eq("project_activities.project_id", *id),
            ActivityFilter::ProjectIds(ids) => {
                Condition::in_ids("project_activities.project_id", ids)
            }
            ActivityFilter::TaskId(id) => Condition::eq("project_activities.task_id", *id),
            ActivityFilter::TaskTitle(text) => {
                let title = Condition::contains("tasks.title", text);
                match parse_id(text) {
                    Some(id) => Condition::any(vec![
                        Condition::eq("project_activities.task_id", id),
                        title,
                    ]),
                    None => title,
                }
            }
            ActivityFilter::Creator(CreatorMatch::User(id)) => {
                Condition::eq("project_activities.creator_id", *id)
            }
            ActivityFilter::Creator(CreatorMatch::Name(name)) => Condition::any(vec![
                Condition::contains("users.username", name),
                Condition::contains("users.name", name),
            ]),
            ActivityFilter::Created(date) => date.condition("project_activities.date_creation"),
            ActivityFilter::TaskStatus(status) => Condition::eq("tasks.is_active", status.as_db()),
            ActivityFilter::ProjectName(name) => Condition::eq_nocase("projects.name", name),
            ActivityFilter::Any(filters) => any_of(filters),
        }
    }
}

/// Attributes understood by the activity search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAttribute {
    Created,
    Creator,
    Project,
    Status,
    Task,
}

impl ActivityAttribute {
    /// Every accepted spelling, aliases included.
    pub const NAMES: &'static [&'static str] =
        &["created", "creator", "project", "status", "task", "title"];

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "created" => ActivityAttribute::Created,
            "creator" => ActivityAttribute::Creator,
            "project" => ActivityAttribute::Project,
            "status" => ActivityAttribute::Status,
            "task" | "title" => ActivityAttribute::Task,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKey {
    Attribute(ActivityAttribute),
    Word(usize),
}

/// Turns activity search text into a seeded [`QueryBuilder`].
#[derive(Debug, Clone)]
pub struct ActivityLexer {
    current_user_id: i64,
    dates: DateParser,
}

impl ActivityLexer {
    pub fn new(current_user_id: i64, dates: DateParser) -> Self {
        Self {
            current_user_id,
            dates,
        }
    }

    /// Parses `search` into a builder over the activity query.
    pub fn build(&self, search: &str) -> FilterResult<QueryBuilder<ActivityFilter>> {
        let filters = self.parse(search)?;
        debug!(
            "event=search_build module=filter family=activity filters={}",
            filters.len()
        );
        Ok(filters
            .into_iter()
            .fold(QueryBuilder::new(), QueryBuilder::with_filter))
    }

    /// Parses `search` into filters, in order of first appearance.
    pub fn parse(&self, search: &str) -> FilterResult<Vec<ActivityFilter>> {
        if search.trim().is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let mut entries = Vec::new();
        for (index, positioned) in Lexer::new(search).tokenize().into_iter().enumerate() {
            match positioned.token {
                SearchToken::Text(word) => {
                    entries.push((GroupKey::Word(index), ActivityFilter::TaskTitle(word)));
                }
                SearchToken::Attribute { name, value } => match ActivityAttribute::parse(&name) {
                    Some(attribute) => {
                        let filter = self.attribute_filter(attribute, &name, &value)?;
                        entries.push((GroupKey::Attribute(attribute), filter));
                    }
                    None => {
                        warn_unknown_attribute("activity", &name, ActivityAttribute::NAMES);
                        entries.push((
                            GroupKey::Word(index),
                            ActivityFilter::TaskTitle(format!("{name}:{value}")),
                        ));
                    }
                },
            }
        }

        Ok(group_by_key(entries, ActivityFilter::Any))
    }

    fn attribute_filter(
        &self,
        attribute: ActivityAttribute,
        name: &str,
        value: &str,
    ) -> FilterResult<ActivityFilter> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FilterError::invalid_value(name, value, "a non-empty value"));
        }

        Ok(match attribute {
            ActivityAttribute::Created => ActivityFilter::Created(
                DateMatch::parse(value, &self.dates)
                    .ok_or_else(|| FilterError::invalid_value(name, value, "a date"))?,
            ),
            ActivityAttribute::Creator => {
                ActivityFilter::Creator(if value.eq_ignore_ascii_case("me") {
                    CreatorMatch::User(self.current_user_id)
                } else {
                    CreatorMatch::Name(value.to_string())
                })
            }
            ActivityAttribute::Project => match parse_id(value) {
                Some(id) if value.chars().all(|c| c.is_ascii_digit()) => {
                    ActivityFilter::ProjectId(id)
                }
                _ => ActivityFilter::ProjectName(value.to_string()),
            },
            ActivityAttribute::Status => ActivityFilter::TaskStatus(
                TaskStatus::from_keyword(value)
                    .ok_or_else(|| FilterError::invalid_value(name, value, "open or closed"))?,
            ),
            ActivityAttribute::Task => ActivityFilter::TaskTitle(value.to_string()),
        })
    }
}
