//! # reveng
//!
//! Reverse engineers a database's metadata into an in-memory model, scoped
//! to a chosen subset of schemas and tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        TableSelectionSet (include / exclude rules)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │ is_selected(schema, table)
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   MetadataModelProvider (catalog → DatabaseModel)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   SqlExecutor (RelationalConnection, rusqlite)          │
//! └─────────────────────────────────────────────────────────┘
//!                          ▲
//!                          │
//! ┌─────────────────────────────────────────────────────────┐
//! │   Migrator (history table, progress events)             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod executor;
pub mod metadata;
pub mod migrations;
pub mod selection;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::executor::{RelationalConnection, SqlCommand, SqlExecutor, SqliteExecutor};
    pub use crate::metadata::{DatabaseModel, MetadataModelProvider, SqliteMetadataModelProvider};
    pub use crate::migrations::{Migration, Migrator};
    pub use crate::selection::{
        TableSelection, TableSelectionSet, ANY, EXCLUSIVE_ALL, INCLUSIVE_ALL,
    };
}

pub use selection::{TableSelection, TableSelectionSet};
