//! Migration error types.

use std::io;

use thiserror::Error;

use crate::executor::ExecutorError;

/// Result type for migration operations.
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Errors that can occur while loading or applying migrations.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A migration was given an empty id.
    #[error("migration id must not be empty")]
    EmptyMigrationId,

    /// Two migrations share an id.
    #[error("duplicate migration: {0}")]
    DuplicateMigration(String),

    /// A target or applied migration is not among the known migrations.
    #[error("unknown migration: {0}")]
    UnknownMigration(String),

    /// An applied migration's script changed after it was applied.
    #[error("migration '{0}' was modified after it was applied")]
    ChecksumMismatch(String),

    /// A history row is missing its id or checksum.
    #[error("migration history row has no {0}")]
    InvalidHistoryRow(&'static str),

    /// A down script exists without the matching up script.
    #[error("migration '{0}' has a down script but no up script")]
    MissingUpScript(String),
}
