//! rusqlite-backed statement executor.

use rusqlite::{params_from_iter, Batch, Connection};
use tracing::debug;

use super::connection::RelationalConnection;
use super::error::{ExecutorError, ExecutorResult};
use super::value::{Row, SqlCommand, SqlValue};
use super::SqlExecutor;

/// Executes statements through rusqlite.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteExecutor;

impl SqliteExecutor {
    pub fn new() -> Self {
        Self
    }
}

/// Open `conn`, run `f` against the handle, and close again whatever `f` returned.
fn with_open<T>(
    conn: &mut RelationalConnection,
    f: impl FnOnce(&Connection) -> ExecutorResult<T>,
) -> ExecutorResult<T> {
    conn.open()?;
    let result = conn.handle().and_then(f);
    conn.close();
    result
}

/// Run every statement of a parameterless script, split by SQLite itself.
///
/// Statements that return rows (some pragmas) are stepped to completion and
/// count as changing nothing.
fn execute_script(handle: &Connection, sql: &str) -> ExecutorResult<usize> {
    let mut batch = Batch::new(handle, sql);
    let mut affected = 0;
    while let Some(mut stmt) = batch.next()? {
        if stmt.column_count() > 0 {
            let mut rows = stmt.query([])?;
            while rows.next()?.is_some() {}
        } else {
            affected += stmt.execute([])?;
        }
    }
    Ok(affected)
}

fn require_sql(sql: &str) -> ExecutorResult<()> {
    if sql.trim().is_empty() {
        Err(ExecutorError::EmptyCommand)
    } else {
        Ok(())
    }
}

impl SqlExecutor for SqliteExecutor {
    fn execute_non_query(
        &self,
        conn: &mut RelationalConnection,
        commands: &[SqlCommand],
    ) -> ExecutorResult<usize> {
        for command in commands {
            require_sql(&command.sql)?;
        }

        with_open(conn, |handle| {
            let tx = handle.unchecked_transaction()?;
            let mut affected = 0;
            for command in commands {
                debug!(sql = %command.sql, params = command.params.len(), "executing command");
                affected += if command.params.is_empty() {
                    execute_script(&tx, &command.sql)?
                } else {
                    tx.execute(&command.sql, params_from_iter(command.params.iter()))?
                };
            }
            tx.commit()?;
            Ok(affected)
        })
    }

    fn execute_scalar(
        &self,
        conn: &mut RelationalConnection,
        sql: &str,
    ) -> ExecutorResult<Option<SqlValue>> {
        require_sql(sql)?;

        with_open(conn, |handle| {
            debug!(sql = %sql, "executing scalar");
            let mut stmt = handle.prepare(sql)?;
            let mut rows = stmt.query([])?;
            let value = match rows.next()? {
                Some(row) => Some(SqlValue::from(row.get_ref(0)?)),
                None => None,
            };
            Ok(value)
        })
    }

    fn execute_reader(&self, conn: &mut RelationalConnection, sql: &str) -> ExecutorResult<Vec<Row>> {
        require_sql(sql)?;

        with_open(conn, |handle| {
            debug!(sql = %sql, "executing reader");
            let mut stmt = handle.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let mut rows = stmt.query([])?;
            let mut result = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(columns.len());
                for (idx, name) in columns.iter().enumerate() {
                    values.push((name.clone(), SqlValue::from(row.get_ref(idx)?)));
                }
                result.push(Row { values });
            }
            Ok(result)
        })
    }
}
