//! Error types for the search lexers.

use thiserror::Error;

/// A specialized Result type for search parsing.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while turning search text into filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The search text is empty or whitespace.
    #[error("search expression is empty")]
    EmptyExpression,

    /// A known attribute carries a value it cannot use.
    #[error("invalid value for {attribute}: {value:?} ({expected})")]
    InvalidValue {
        /// The attribute name as typed.
        attribute: String,
        /// The rejected value.
        value: String,
        /// What the attribute accepts.
        expected: &'static str,
    },
}

impl FilterError {
    /// Creates an invalid value error.
    pub fn invalid_value(
        attribute: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        FilterError::InvalidValue {
            attribute: attribute.into(),
            value: value.into(),
            expected,
        }
    }
}
