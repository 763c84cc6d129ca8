//! Query filters and the search lexers that produce them.
//!
//! A filter narrows one query family (projects, tasks or activity events) by
//! one dimension. Filters are plain values; applying one adds its condition
//! to a [`Query`], AND-combined with everything already there.
//!
//! # Search Syntax
//!
//! The lexers accept whitespace-separated `attribute:value` pairs and free
//! words:
//!
//! - `status:open`, `assignee:me`, `due:<=tomorrow`, `category:"Bug fix"`
//! - repeating an attribute ORs its values: `color:red color:blue`
//! - different attributes are ANDed: `status:open assignee:me`
//! - free words and unknown attributes match the title, one word each
//!
//! # Example
//!
//! ```
//! use taskboard_model::date::DateParser;
//! use taskboard_query::filter::{TaskFilter, TaskLexer};
//!
//! let lexer = TaskLexer::new(1, DateParser::default());
//! let builder = lexer.build("status:open assignee:me")?;
//! assert_eq!(builder.filters().len(), 2);
//! assert!(matches!(builder.filters()[1], TaskFilter::Assignee(_)));
//! # Ok::<(), taskboard_query::filter::FilterError>(())
//! ```

mod activity;
mod date;
mod error;
pub mod lexer;
mod project;
mod task;

pub use activity::{activity_query, ActivityAttribute, ActivityFilter, ActivityLexer, CreatorMatch};
pub use date::{Comparison, DateMatch};
pub use error::{FilterError, FilterResult};
pub use project::{project_query, ProjectFilter};
pub use task::{task_query, AssigneeMatch, CategoryMatch, TaskAttribute, TaskFilter, TaskLexer};

use crate::builder::QueryBuilder;
use crate::query::{Condition, Query};

/// A predicate over one query family.
pub trait Filter {
    /// The unfiltered query of the family this filter narrows.
    fn base_query() -> Query
    where
        Self: Sized;

    /// The condition this filter adds.
    fn condition(&self) -> Condition;

    /// Adds the condition to `query`.
    fn apply(&self, query: &mut Query) {
        query.and_where(self.condition());
    }
}

/// Turns search text into a builder seeded with one filter family.
pub trait SearchLexer {
    type Filter: Filter;

    fn build(&self, search: &str) -> FilterResult<QueryBuilder<Self::Filter>>;
}

impl SearchLexer for TaskLexer {
    type Filter = TaskFilter;

    fn build(&self, search: &str) -> FilterResult<QueryBuilder<TaskFilter>> {
        TaskLexer::build(self, search)
    }
}

impl SearchLexer for ActivityLexer {
    type Filter = ActivityFilter;

    fn build(&self, search: &str) -> FilterResult<QueryBuilder<ActivityFilter>> {
        ActivityLexer::build(self, search)
    }
}

/// Condition matching any of `filters`; no filters match nothing.
fn any_of<F: Filter>(filters: &[F]) -> Condition {
    Condition::any(filters.iter().map(Filter::condition).collect())
}

/// Parses `#123` or `123` as an id.
fn parse_id(text: &str) -> Option<i64> {
    text.trim().trim_start_matches('#').parse().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests;
