//! Composition of filters over one base query.

use log::debug;
use rusqlite::Connection;

use crate::error::QueryResult;
use crate::filter::Filter;
use crate::formatter::Formatter;
use crate::query::Query;
use crate::record::Record;

/// An ordered list of filters over a base query.
///
/// The stored query only carries sort keys and limit; filters are applied to
/// a copy each time the builder runs, so running it twice never duplicates a
/// condition.
///
/// # Example
///
/// ```
/// use taskboard_model::db::open_db_in_memory;
/// use taskboard_model::models::ProjectStatus;
/// use taskboard_query::filter::ProjectFilter;
/// use taskboard_query::QueryBuilder;
///
/// let conn = open_db_in_memory()?;
/// let mut builder = QueryBuilder::new()
///     .with_filter(ProjectFilter::Status(ProjectStatus::Active))
///     .with_filter(ProjectFilter::Ids(vec![]));
/// builder.query_mut().asc("projects.start_date");
///
/// assert!(builder.records(&conn)?.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder<F> {
    query: Query,
    filters: Vec<F>,
}

impl<F: Filter> Default for QueryBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Filter> QueryBuilder<F> {
    /// Creates a builder over the filter family's base query.
    pub fn new() -> Self {
        Self::with_query(F::base_query())
    }

    /// Creates a builder over an explicit query.
    pub fn with_query(query: Query) -> Self {
        Self {
            query,
            filters: Vec::new(),
        }
    }

    /// Appends a filter.
    pub fn with_filter(mut self, filter: F) -> Self {
        self.filters.push(filter);
        self
    }

    /// The query used for sort order and limit.
    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Registered filters, in registration order.
    pub fn filters(&self) -> &[F] {
        &self.filters
    }

    /// Returns the query with every filter applied.
    pub fn build(&self) -> Query {
        let mut query = self.query.clone();
        for filter in &self.filters {
            filter.apply(&mut query);
        }
        query
    }

    /// Runs the composed query.
    pub fn records(&self, conn: &Connection) -> QueryResult<Vec<Record>> {
        let records = self.build().fetch(conn)?;
        debug!(
            "event=query_records module=builder filters={} rows={}",
            self.filters.len(),
            records.len()
        );
        Ok(records)
    }

    /// Runs the composed query and maps each row, keeping database order.
    pub fn format<T: Formatter>(&self, conn: &Connection, formatter: &T) -> QueryResult<Vec<T::Output>> {
        Ok(self
            .records(conn)?
            .iter()
            .map(|record| formatter.map(record))
            .collect())
    }
}
