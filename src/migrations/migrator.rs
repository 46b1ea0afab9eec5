//! Applies and reverts migrations, recording them in a history table.

use std::collections::HashSet;

use tracing::debug;

use super::error::{MigrationError, MigrationResult};
use super::events;
use super::migration::Migration;
use crate::executor::{
    quote_identifier, quote_literal, RelationalConnection, Row, SqlCommand, SqlExecutor, SqlValue,
};

/// Name of the table recording applied migrations.
pub const HISTORY_TABLE: &str = "__migration_history";

/// Target that reverts every applied migration.
pub const INITIAL_TARGET: &str = "0";

/// A row of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub id: String,
    pub checksum: String,
}

/// What a `migrate` call did, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub reverted: Vec<String>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.reverted.is_empty()
    }
}

/// Moves a database between migration states.
pub struct Migrator<E: SqlExecutor> {
    executor: E,
    migrations: Vec<Migration>,
}

impl<E: SqlExecutor> Migrator<E> {
    /// Create a migrator over `migrations`, which are ordered by id.
    ///
    /// # Errors
    /// Returns [`MigrationError::DuplicateMigration`] if two migrations share an id.
    pub fn new(executor: E, mut migrations: Vec<Migration>) -> MigrationResult<Self> {
        migrations.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = migrations.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(MigrationError::DuplicateMigration(pair[0].id.clone()));
        }

        Ok(Self {
            executor,
            migrations,
        })
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Does the history table exist?
    pub fn history_exists(&self, conn: &mut RelationalConnection) -> MigrationResult<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = {}",
            quote_literal(HISTORY_TABLE)
        );
        let count = self.executor.execute_scalar(conn, &sql)?;
        Ok(count.and_then(|v| v.as_i64()).unwrap_or(0) > 0)
    }

    /// Applied migrations in id order. Empty when there is no history table.
    pub fn applied(&self, conn: &mut RelationalConnection) -> MigrationResult<Vec<AppliedMigration>> {
        if !self.history_exists(conn)? {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT migration_id, checksum FROM {} ORDER BY migration_id",
            quote_identifier(HISTORY_TABLE)
        );
        let rows = self.executor.execute_reader(conn, &sql)?;
        rows.iter()
            .map(|row| -> MigrationResult<AppliedMigration> {
                Ok(AppliedMigration {
                    id: history_str(row, "migration_id")?,
                    checksum: history_str(row, "checksum")?,
                })
            })
            .collect()
    }

    /// Bring the database to `target`.
    ///
    /// With no target every pending migration is applied. With a target,
    /// pending migrations up to and including it are applied and applied
    /// migrations after it are reverted, newest first. [`INITIAL_TARGET`]
    /// reverts everything.
    pub fn migrate(
        &self,
        conn: &mut RelationalConnection,
        target: Option<&str>,
    ) -> MigrationResult<MigrationReport> {
        let target_idx = self.target_index(target)?;

        if !self.history_exists(conn)? {
            events::creating_history_table();
            let create = format!(
                "CREATE TABLE {} (migration_id TEXT PRIMARY KEY, checksum TEXT NOT NULL)",
                quote_identifier(HISTORY_TABLE)
            );
            self.executor
                .execute_non_query(conn, &[SqlCommand::new(create)])?;
        }

        let applied = self.applied(conn)?;
        for record in &applied {
            let migration = self
                .find(&record.id)
                .ok_or_else(|| MigrationError::UnknownMigration(record.id.clone()))?;
            if migration.checksum() != record.checksum {
                return Err(MigrationError::ChecksumMismatch(record.id.clone()));
            }
        }
        let applied_ids: HashSet<&str> = applied.iter().map(|r| r.id.as_str()).collect();

        let in_target = |idx: usize| target_idx.is_some_and(|t| idx <= t);

        let to_revert: Vec<&Migration> = self
            .migrations
            .iter()
            .enumerate()
            .rev()
            .filter(|(idx, m)| !in_target(*idx) && applied_ids.contains(m.id.as_str()))
            .map(|(_, m)| m)
            .collect();

        let to_apply: Vec<&Migration> = self
            .migrations
            .iter()
            .enumerate()
            .filter(|(idx, m)| in_target(*idx) && !applied_ids.contains(m.id.as_str()))
            .map(|(_, m)| m)
            .collect();

        let mut report = MigrationReport::default();

        if to_revert.is_empty() && to_apply.is_empty() {
            events::up_to_date();
            return Ok(report);
        }

        for migration in to_revert {
            events::reverting_migration(&migration.id)?;
            let mut commands: Vec<SqlCommand> =
                script_command(&migration.down).into_iter().collect();
            commands.push(
                SqlCommand::new(format!(
                    "DELETE FROM {} WHERE migration_id = ?",
                    quote_identifier(HISTORY_TABLE)
                ))
                .bind(migration.id.as_str()),
            );
            self.executor.execute_non_query(conn, &commands)?;
            report.reverted.push(migration.id.clone());
        }

        for migration in to_apply {
            events::applying_migration(&migration.id)?;
            let mut commands: Vec<SqlCommand> =
                script_command(&migration.up).into_iter().collect();
            commands.push(
                SqlCommand::new(format!(
                    "INSERT INTO {} (migration_id, checksum) VALUES (?, ?)",
                    quote_identifier(HISTORY_TABLE)
                ))
                .bind(migration.id.as_str())
                .bind(SqlValue::Text(migration.checksum())),
            );
            self.executor.execute_non_query(conn, &commands)?;
            report.applied.push(migration.id.clone());
        }

        debug!(
            applied = report.applied.len(),
            reverted = report.reverted.len(),
            "migration finished"
        );
        Ok(report)
    }

    /// Drop the history table if it exists.
    pub fn drop_history(&self, conn: &mut RelationalConnection) -> MigrationResult<()> {
        if !self.history_exists(conn)? {
            return Ok(());
        }

        events::dropping_history_table();
        let drop = format!("DROP TABLE {}", quote_identifier(HISTORY_TABLE));
        self.executor.execute_non_query(conn, &[SqlCommand::new(drop)])?;
        Ok(())
    }

    fn find(&self, id: &str) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.id == id)
    }

    /// Index of the last migration that should be applied, `None` for none.
    fn target_index(&self, target: Option<&str>) -> MigrationResult<Option<usize>> {
        match target {
            None => Ok(self.migrations.len().checked_sub(1)),
            Some(INITIAL_TARGET) => Ok(None),
            Some(id) => self
                .migrations
                .iter()
                .position(|m| m.id == id)
                .map(Some)
                .ok_or_else(|| MigrationError::UnknownMigration(id.to_string())),
        }
    }
}

/// The whole script as one command, or nothing when it is blank.
fn script_command(script: &str) -> Option<SqlCommand> {
    if script.trim().is_empty() {
        None
    } else {
        Some(SqlCommand::new(script))
    }
}

fn history_str(row: &Row, column: &'static str) -> MigrationResult<String> {
    row.get_str(column)
        .map(str::to_string)
        .ok_or(MigrationError::InvalidHistoryRow(column))
}
