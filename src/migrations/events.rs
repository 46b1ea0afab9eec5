//! Progress events emitted while migrating.
//!
//! Every event is logged at info level with a stable numeric `event_id`
//! field, so log consumers can key on the id rather than the message text.

use tracing::info;

use super::error::{MigrationError, MigrationResult};

/// Migration progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigratorEvent {
    CreatingHistoryTable = 1,
    DroppingHistoryTable = 2,
    ApplyingMigration = 3,
    RevertingMigration = 4,
    UpToDate = 5,
}

impl MigratorEvent {
    /// Stable numeric id of the event.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Human-readable message, naming the migration where relevant.
    pub fn message(self, migration_id: Option<&str>) -> String {
        let migration_id = migration_id.unwrap_or_default();
        match self {
            MigratorEvent::CreatingHistoryTable => "Creating migration history table.".to_string(),
            MigratorEvent::DroppingHistoryTable => "Dropping migration history table.".to_string(),
            MigratorEvent::ApplyingMigration => format!("Applying migration '{}'.", migration_id),
            MigratorEvent::RevertingMigration => format!("Reverting migration '{}'.", migration_id),
            MigratorEvent::UpToDate => {
                "No migrations were applied. The database is already up to date.".to_string()
            }
        }
    }
}

fn emit(event: MigratorEvent, migration_id: Option<&str>) {
    info!(
        event_id = event.id(),
        migration_id,
        "{}",
        event.message(migration_id)
    );
}

fn require_id(migration_id: &str) -> MigrationResult<()> {
    if migration_id.is_empty() {
        Err(MigrationError::EmptyMigrationId)
    } else {
        Ok(())
    }
}

pub fn creating_history_table() {
    emit(MigratorEvent::CreatingHistoryTable, None);
}

pub fn dropping_history_table() {
    emit(MigratorEvent::DroppingHistoryTable, None);
}

pub fn applying_migration(migration_id: &str) -> MigrationResult<()> {
    require_id(migration_id)?;
    emit(MigratorEvent::ApplyingMigration, Some(migration_id));
    Ok(())
}

pub fn reverting_migration(migration_id: &str) -> MigrationResult<()> {
    require_id(migration_id)?;
    emit(MigratorEvent::RevertingMigration, Some(migration_id));
    Ok(())
}

pub fn up_to_date() {
    emit(MigratorEvent::UpToDate, None);
}
