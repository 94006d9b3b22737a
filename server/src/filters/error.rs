//! Filter error types

use thiserror::Error;

/// Errors produced while translating query pairs into predicates
///
/// Every variant is a deterministic validation failure of the input;
/// retrying the same pair always fails the same way.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Value shape does not fit the operation (array form where it is
    /// forbidden, malformed range, empty array)
    #[error("wrong value format for \"{operation}\" operation")]
    WrongFormat { operation: String },

    /// `null` given to an operation without an `IS` / `IS NOT` form
    #[error("wrong value \"null\" for \"{operation}\" operation")]
    NullNotAllowed { operation: String },

    /// Array literal is not a JSON array
    #[error("invalid array literal: {source}")]
    ArrayLiteral {
        #[source]
        source: serde_json::Error,
    },

    /// Key still carries a bracket suffix that is not a known operator
    #[error("unknown operator in filter key \"{key}\"")]
    UnknownOperator { key: String },

    /// Key is not in the allowed list
    #[error("cannot filter by key \"{key}\"")]
    UnknownKey { key: String },

    #[error("filter key is empty")]
    EmptyKey,

    #[error("maximum {max} filters allowed")]
    TooManyFilters { max: usize },

    /// A failure tied to the query pair that caused it
    #[error("filter \"{key}\": {source}")]
    Entry {
        key: String,
        value: String,
        #[source]
        source: Box<FilterError>,
    },
}

impl FilterError {
    pub(crate) fn wrong_format(operation: impl Into<String>) -> Self {
        Self::WrongFormat {
            operation: operation.into(),
        }
    }

    pub(crate) fn null_not_allowed(operation: impl Into<String>) -> Self {
        Self::NullNotAllowed {
            operation: operation.into(),
        }
    }

    /// Attach the offending query pair
    pub fn for_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Entry {
            key: key.into(),
            value: value.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code (used in API error bodies)
    pub fn code(&self) -> &'static str {
        match self {
            Self::WrongFormat { .. } => "INVALID_FILTER_FORMAT",
            Self::NullNotAllowed { .. } => "INVALID_FILTER_NULL",
            Self::ArrayLiteral { .. } => "INVALID_FILTER_ARRAY",
            Self::UnknownOperator { .. } => "UNKNOWN_FILTER_OPERATOR",
            Self::UnknownKey { .. } => "INVALID_FILTER_KEY",
            Self::EmptyKey => "EMPTY_FILTER_KEY",
            Self::TooManyFilters { .. } => "TOO_MANY_FILTERS",
            Self::Entry { source, .. } => source.code(),
        }
    }
}
