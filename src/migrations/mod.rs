//! Schema migrations.
//!
//! Migrations are pairs of up/down scripts identified by an id; ids sort in
//! the order migrations are applied. The [`Migrator`] records applied ids
//! and checksums in [`HISTORY_TABLE`] and reports progress through
//! [`events`].
//!
//! # Example
//!
//! ```
//! use reveng::executor::{RelationalConnection, SqliteExecutor};
//! use reveng::migrations::{Migration, Migrator};
//!
//! let migrations = vec![
//!     Migration::new("0001_customers", "CREATE TABLE customers (id INTEGER PRIMARY KEY)", "DROP TABLE customers").unwrap(),
//! ];
//! let migrator = Migrator::new(SqliteExecutor::new(), migrations).unwrap();
//! let mut conn = RelationalConnection::in_memory();
//!
//! let report = migrator.migrate(&mut conn, None).unwrap();
//! assert_eq!(report.applied, vec!["0001_customers".to_string()]);
//! ```

mod error;
pub mod events;
mod migration;
mod migrator;

pub use error::{MigrationError, MigrationResult};
pub use events::MigratorEvent;
pub use migration::Migration;
pub use migrator::{AppliedMigration, MigrationReport, Migrator, HISTORY_TABLE, INITIAL_TARGET};
