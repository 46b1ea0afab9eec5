//! Executor error types.

use thiserror::Error;

/// Result type for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Errors that can occur while running statements.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The underlying SQLite call failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A command with no SQL text was submitted.
    #[error("command text must not be empty")]
    EmptyCommand,

    /// A connection was requested with no connection string.
    #[error("connection string must not be empty")]
    EmptyConnectionString,

    /// The connection handle was used while closed.
    #[error("connection is not open")]
    NotOpen,
}
