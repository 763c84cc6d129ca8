//! Task filters and the task search lexer.

use log::debug;
use taskboard_model::color::ColorPalette;
use taskboard_model::date::DateParser;
use taskboard_model::models::TaskStatus;

use super::lexer::{group_by_key, warn_unknown_attribute, Lexer, SearchToken};
use super::{any_of, parse_id, Comparison, DateMatch, Filter, FilterError, FilterResult};
use crate::builder::QueryBuilder;
use crate::query::{Condition, Query};

/// Unfiltered task query, joined with the board, category, people and
/// project it references.
pub fn task_query() -> Query {
    Query::new(
        "SELECT
            tasks.id AS id,
            tasks.title AS title,
            tasks.description AS description,
            tasks.project_id AS project_id,
            tasks.column_id AS column_id,
            tasks.swimlane_id AS swimlane_id,
            tasks.owner_id AS owner_id,
            tasks.creator_id AS creator_id,
            tasks.category_id AS category_id,
            tasks.color_id AS color_id,
            tasks.position AS position,
            tasks.is_active AS is_active,
            tasks.priority AS priority,
            tasks.reference AS reference,
            tasks.date_creation AS date_creation,
            tasks.date_modification AS date_modification,
            tasks.date_completed AS date_completed,
            tasks.date_started AS date_started,
            tasks.date_due AS date_due,
            tasks.date_moved AS date_moved,
            tasks.recurrence_status AS recurrence_status,
            columns.title AS column_title,
            columns.position AS column_position,
            swimlanes.name AS swimlane_name,
            categories.name AS category_name,
            assignee.username AS assignee_username,
            assignee.name AS assignee_name,
            creator.username AS creator_username,
            creator.name AS creator_name,
            projects.name AS project_name
        FROM tasks
        LEFT JOIN columns ON columns.id = tasks.column_id
        LEFT JOIN swimlanes ON swimlanes.id = tasks.swimlane_id
        LEFT JOIN project_has_categories AS categories ON categories.id = tasks.category_id
        LEFT JOIN users AS assignee ON assignee.id = tasks.owner_id
        LEFT JOIN users AS creator ON creator.id = tasks.creator_id
        LEFT JOIN projects ON projects.id = tasks.project_id",
    )
}

/// Assignee selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeMatch {
    User(i64),
    Nobody,
    /// Substring of the username or full name.
    Name(String),
}

/// Category selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatch {
    None,
    Name(String),
}

/// Narrows the task query.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskFilter {
    Id(i64),
    Project(i64),
    /// Membership in a set of projects; an empty set matches nothing.
    ProjectIds(Vec<i64>),
    ProjectName(String),
    Status(TaskStatus),
    /// Substring of the title; `#123` or `123` also matches the task id.
    Title(String),
    Description(String),
    Assignee(AssigneeMatch),
    Category(CategoryMatch),
    /// Palette color id.
    Color(String),
    Column(String),
    Swimlane(String),
    Reference(String),
    Priority(Comparison, i64),
    Created(DateMatch),
    Modified(DateMatch),
    Due(DateMatch),
    Started(DateMatch),
    Completed(DateMatch),
    /// Matches if any inner filter matches; empty matches nothing.
    Any(Vec<TaskFilter>),
}

impl Filter for TaskFilter {
    fn base_query() -> Query {
        task_query()
    }

    fn condition(&self) -> Condition {
        match self {
            TaskFilter::Id(id) => Condition::eq("tasks.id", *id),
            TaskFilter::Project(id) => Condition::eq("tasks.project_id", *id),
            TaskFilter::ProjectIds(ids) => Condition::in_ids("tasks.project_id", ids),
            TaskFilter::ProjectName(name) => Condition::eq_nocase("projects.name", name),
            TaskFilter::Status(status) => Condition::eq("tasks.is_active", status.as_db()),
            TaskFilter::Title(text) => {
                let title = Condition::contains("tasks.title", text);
                match parse_id(text) {
                    Some(id) => Condition::any(vec![Condition::eq("tasks.id", id), title]),
                    None => title,
                }
            }
            TaskFilter::Description(text) => Condition::contains("tasks.description", text),
            TaskFilter::Assignee(AssigneeMatch::User(id)) => Condition::eq("tasks.owner_id", *id),
            TaskFilter::Assignee(AssigneeMatch::Nobody) => Condition::eq("tasks.owner_id", 0_i64),
            TaskFilter::Assignee(AssigneeMatch::Name(name)) => Condition::any(vec![
                Condition::contains("assignee.username", name),
                Condition::contains("assignee.name", name),
            ]),
            TaskFilter::Category(CategoryMatch::None) => Condition::eq("tasks.category_id", 0_i64),
            TaskFilter::Category(CategoryMatch::Name(name)) => {
                Condition::eq_nocase("categories.name", name)
            }
            TaskFilter::Color(color) => Condition::eq("tasks.color_id", color.clone()),
            TaskFilter::Column(title) => Condition::eq_nocase("columns.title", title),
            TaskFilter::Swimlane(name) => Condition::eq_nocase("swimlanes.name", name),
            TaskFilter::Reference(reference) => Condition::eq_nocase("tasks.reference", reference),
            TaskFilter::Priority(op, value) => Condition::compare("tasks.priority", op.as_sql(), *value),
            TaskFilter::Created(date) => date.condition("tasks.date_creation"),
            TaskFilter::Modified(date) => date.condition("tasks.date_modification"),
            TaskFilter::Due(date) => date.condition("tasks.date_due"),
            TaskFilter::Started(date) => date.condition("tasks.date_started"),
            TaskFilter::Completed(date) => date.condition("tasks.date_completed"),
            TaskFilter::Any(filters) => any_of(filters),
        }
    }
}

/// Attributes understood by the task search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAttribute {
    Assignee,
    Category,
    Color,
    Column,
    Completed,
    Created,
    Description,
    Due,
    Id,
    Modified,
    Priority,
    Project,
    Reference,
    Started,
    Status,
    Swimlane,
    Title,
}

impl TaskAttribute {
    /// Every accepted spelling, aliases included.
    pub const NAMES: &'static [&'static str] = &[
        "assignee",
        "category",
        "color",
        "column",
        "completed",
        "created",
        "description",
        "desc",
        "due",
        "id",
        "modified",
        "updated",
        "priority",
        "project",
        "ref",
        "reference",
        "started",
        "status",
        "swimlane",
        "title",
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "assignee" => TaskAttribute::Assignee,
            "category" => TaskAttribute::Category,
            "color" => TaskAttribute::Color,
            "column" => TaskAttribute::Column,
            "completed" => TaskAttribute::Completed,
            "created" => TaskAttribute::Created,
            "description" | "desc" => TaskAttribute::Description,
            "due" => TaskAttribute::Due,
            "id" => TaskAttribute::Id,
            "modified" | "updated" => TaskAttribute::Modified,
            "priority" => TaskAttribute::Priority,
            "project" => TaskAttribute::Project,
            "ref" | "reference" => TaskAttribute::Reference,
            "started" => TaskAttribute::Started,
            "status" => TaskAttribute::Status,
            "swimlane" => TaskAttribute::Swimlane,
            "title" => TaskAttribute::Title,
            _ => return None,
        })
    }
}

/// Key used to group filters: repeated attributes are OR-ed, every free
/// word stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKey {
    Attribute(TaskAttribute),
    Word(usize),
}

/// Turns task search text into a seeded [`QueryBuilder`].
#[derive(Debug, Clone)]
pub struct TaskLexer {
    current_user_id: i64,
    dates: DateParser,
    colors: ColorPalette,
}

impl TaskLexer {
    /// Creates a lexer resolving `me` to `current_user_id` and dates in the
    /// parser's time zone.
    pub fn new(current_user_id: i64, dates: DateParser) -> Self {
        Self {
            current_user_id,
            dates,
            colors: ColorPalette,
        }
    }

    /// Parses `search` into a builder over the task query.
    pub fn build(&self, search: &str) -> FilterResult<QueryBuilder<TaskFilter>> {
        let filters = self.parse(search)?;
        debug!(
            "event=search_build module=filter family=task filters={}",
            filters.len()
        );
        Ok(filters
            .into_iter()
            .fold(QueryBuilder::new(), QueryBuilder::with_filter))
    }

    /// Parses `search` into filters, in order of first appearance.
    pub fn parse(&self, search: &str) -> FilterResult<Vec<TaskFilter>> {
        if search.trim().is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let mut entries = Vec::new();
        for (index, positioned) in Lexer::new(search).tokenize().into_iter().enumerate() {
            match positioned.token {
                SearchToken::Text(word) => {
                    entries.push((GroupKey::Word(index), TaskFilter::Title(word)));
                }
                SearchToken::Attribute { name, value } => match TaskAttribute::parse(&name) {
                    Some(attribute) => {
                        let filter = self.attribute_filter(attribute, &name, &value)?;
                        entries.push((GroupKey::Attribute(attribute), filter));
                    }
                    None => {
                        warn_unknown_attribute("task", &name, TaskAttribute::NAMES);
                        entries.push((GroupKey::Word(index), TaskFilter::Title(format!("{name}:{value}"))));
                    }
                },
            }
        }

        Ok(group_by_key(entries, TaskFilter::Any))
    }

    fn attribute_filter(
        &self,
        attribute: TaskAttribute,
        name: &str,
        value: &str,
    ) -> FilterResult<TaskFilter> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FilterError::invalid_value(name, value, "a non-empty value"));
        }
        let date = |expected| {
            DateMatch::parse(value, &self.dates)
                .ok_or_else(|| FilterError::invalid_value(name, value, expected))
        };

        Ok(match attribute {
            TaskAttribute::Assignee => TaskFilter::Assignee(match value.to_lowercase().as_str() {
                "me" => AssigneeMatch::User(self.current_user_id),
                "nobody" | "none" => AssigneeMatch::Nobody,
                _ => AssigneeMatch::Name(value.to_string()),
            }),
            TaskAttribute::Category => TaskFilter::Category(if value.eq_ignore_ascii_case("none") {
                CategoryMatch::None
            } else {
                CategoryMatch::Name(value.to_string())
            }),
            TaskAttribute::Color => TaskFilter::Color(
                self.colors
                    .find(value)
                    .map_or_else(|| value.to_string(), str::to_string),
            ),
            TaskAttribute::Column => TaskFilter::Column(value.to_string()),
            TaskAttribute::Completed => TaskFilter::Completed(date("a date")?),
            TaskAttribute::Created => TaskFilter::Created(date("a date")?),
            TaskAttribute::Description => TaskFilter::Description(value.to_string()),
            TaskAttribute::Due => TaskFilter::Due(date("a date")?),
            TaskAttribute::Id => TaskFilter::Id(
                parse_id(value).ok_or_else(|| FilterError::invalid_value(name, value, "a task id"))?,
            ),
            TaskAttribute::Modified => TaskFilter::Modified(date("a date")?),
            TaskAttribute::Priority => {
                let (op, number) = Comparison::split(value);
                let number = number
                    .parse()
                    .map_err(|_| FilterError::invalid_value(name, value, "an integer"))?;
                TaskFilter::Priority(op, number)
            }
            TaskAttribute::Project => match parse_id(value) {
                Some(id) if value.chars().all(|c| c.is_ascii_digit()) => TaskFilter::Project(id),
                _ => TaskFilter::ProjectName(value.to_string()),
            },
            TaskAttribute::Reference => TaskFilter::Reference(value.to_string()),
            TaskAttribute::Started => TaskFilter::Started(date("a date")?),
            TaskAttribute::Status => TaskFilter::Status(
                TaskStatus::from_keyword(value)
                    .ok_or_else(|| FilterError::invalid_value(name, value, "open or closed"))?,
            ),
            TaskAttribute::Swimlane => TaskFilter::Swimlane(value.to_string()),
            TaskAttribute::Title => TaskFilter::Title(value.to_string()),
        })
    }
}
