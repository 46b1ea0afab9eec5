//! Selection error types.

use std::fmt;

use thiserror::Error;

/// Result type for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// The two axes a selection rule constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Schema,
    Table,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Schema => f.write_str("schema"),
            Axis::Table => f.write_str("table"),
        }
    }
}

/// Errors raised when a caller hands the selection engine malformed input.
///
/// These are caller contract violations; nothing here is retried or
/// coerced into a default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A schema or table name was empty.
    #[error("{0} name must not be empty")]
    EmptyName(Axis),

    /// A textual rule could not be split into schema and table.
    #[error("malformed table selection '{0}': expected [!]schema.table or [!]table")]
    Malformed(String),
}
