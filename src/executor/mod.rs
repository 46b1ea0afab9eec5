//! SQL statement execution.
//!
//! The executor runs commands against a [`RelationalConnection`], opening it
//! for the duration of each call and closing it again afterwards, even when
//! a command fails.
//!
//! # Example
//!
//! ```
//! use reveng::executor::{RelationalConnection, SqlCommand, SqlExecutor, SqliteExecutor, SqlValue};
//!
//! let executor = SqliteExecutor::new();
//! let mut conn = RelationalConnection::in_memory();
//!
//! executor
//!     .execute_non_query(&mut conn, &[SqlCommand::new("CREATE TABLE t (id INTEGER)")])
//!     .unwrap();
//! let count = executor.execute_scalar(&mut conn, "SELECT COUNT(*) FROM t").unwrap();
//! assert_eq!(count, Some(SqlValue::Integer(0)));
//! ```

mod connection;
mod error;
mod sqlite;
mod value;

pub use connection::{ConnectionSource, RelationalConnection};
pub use error::{ExecutorError, ExecutorResult};
pub use sqlite::SqliteExecutor;
pub use value::{Row, SqlCommand, SqlValue};

/// Runs statements against a connection.
pub trait SqlExecutor {
    /// Run every command in order inside one transaction.
    ///
    /// A command without parameters may hold a whole script of statements;
    /// a command with parameters must be a single statement. Returns the
    /// total number of rows changed.
    fn execute_non_query(
        &self,
        conn: &mut RelationalConnection,
        commands: &[SqlCommand],
    ) -> ExecutorResult<usize>;

    /// First column of the first row, or `None` when the query returns nothing.
    fn execute_scalar(
        &self,
        conn: &mut RelationalConnection,
        sql: &str,
    ) -> ExecutorResult<Option<SqlValue>>;

    /// Every row of the query.
    fn execute_reader(&self, conn: &mut RelationalConnection, sql: &str) -> ExecutorResult<Vec<Row>>;
}

/// Quote an identifier for SQLite (`"name"`, embedded quotes doubled).
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for SQLite (`'text'`, embedded quotes doubled).
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
