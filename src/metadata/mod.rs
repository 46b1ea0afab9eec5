//! Metadata provider module.
//!
//! Reverse engineers a database catalog into a [`DatabaseModel`], keeping
//! only the tables a [`TableSelectionSet`](crate::selection::TableSelectionSet)
//! selects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  SqliteMetadataModelProvider                    │
//! │  list_schemas() ─► list_tables() ─► is_selected? ─► table_model()│
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         SqlExecutor                             │
//! │              (RelationalConnection, rusqlite)                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use reveng::executor::{RelationalConnection, SqlCommand, SqlExecutor, SqliteExecutor};
//! use reveng::metadata::SqliteMetadataModelProvider;
//! use reveng::selection::TableSelectionSet;
//!
//! let mut conn = RelationalConnection::in_memory();
//! SqliteExecutor::new()
//!     .execute_non_query(&mut conn, &[
//!         SqlCommand::new("CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT)"),
//!         SqlCommand::new("CREATE TABLE audit_log (id INTEGER PRIMARY KEY)"),
//!     ])
//!     .unwrap();
//!
//! let selection = TableSelectionSet::from_rules(["main.*", "!audit_log"]).unwrap();
//! let provider = SqliteMetadataModelProvider::new(SqliteExecutor::new());
//! let model = provider.generate_model(&mut conn, Some(&selection)).unwrap();
//!
//! assert_eq!(model.qualified_names(), vec!["main.customers".to_string()]);
//! assert_eq!(model.tables[0].entity_name, "Customer");
//! ```

mod naming;
mod provider;
mod sqlite_provider;
mod types;

pub use naming::{entity_name, property_name, singularize};
pub use provider::{MetadataError, MetadataModelProvider, MetadataResult};
pub use sqlite_provider::SqliteMetadataModelProvider;
pub use types::*;
