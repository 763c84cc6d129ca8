//! Search and listing pipeline for taskboard.
//!
//! A search string goes through a lexer, which produces typed filters. The
//! filters are registered on a [`QueryBuilder`] over the base query of their
//! family, and the builder's rows are handed to a [`Formatter`] that turns
//! each [`Record`] into a view model.
//!
//! ```text
//! "status:open assignee:me"
//!        │ TaskLexer
//!        ▼
//! [Status(Open), Assignee(User(1))] ── QueryBuilder ── SQL ── Vec<Record>
//!                                                               │ Formatter
//!                                                               ▼
//!                                                        Vec<TaskGanttBar>
//! ```

pub mod builder;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod query;
pub mod record;

pub use builder::QueryBuilder;
pub use error::{QueryError, QueryResult};
pub use formatter::{Formatter, LinkBuilder};
pub use query::{Condition, Direction, Query};
pub use record::Record;
