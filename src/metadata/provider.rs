//! MetadataModelProvider trait definition.
//!
//! A provider reads a database catalog and turns the tables picked by a
//! [`TableSelectionSet`] into a [`DatabaseModel`].

use thiserror::Error;

use super::types::DatabaseModel;
use crate::executor::ExecutorError;
use crate::selection::{SelectionError, TableSelectionSet};

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while reverse engineering a database.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// A catalog query returned a row without an expected column.
    #[error("catalog row is missing column '{column}' ({query})")]
    MissingColumn { query: &'static str, column: &'static str },
}

/// Builds a [`DatabaseModel`] from a live database.
pub trait MetadataModelProvider {
    /// Reverse engineer the database behind `connection_string`.
    ///
    /// With `selection` set, a table is modelled only when
    /// [`TableSelectionSet::is_selected`] accepts it. With no selection every
    /// table is modelled. A database file that does not exist is an error,
    /// never an empty model.
    fn generate_metadata_model(
        &self,
        connection_string: &str,
        selection: Option<&TableSelectionSet>,
    ) -> MetadataResult<DatabaseModel>;
}
