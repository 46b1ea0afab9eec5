//! SQLite catalog reader.
//!
//! Reads the catalog through SQLite's table-valued pragma functions
//! (`pragma_database_list`, `pragma_table_info`, `pragma_foreign_key_list`)
//! and each schema's `sqlite_master`.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::naming::{entity_name, property_name};
use super::provider::{MetadataError, MetadataModelProvider, MetadataResult};
use super::types::{ColumnModel, DatabaseModel, ForeignKeyModel, TableModel};
use crate::executor::{
    quote_identifier, quote_literal, RelationalConnection, Row, SqlExecutor, SqliteExecutor,
};
use crate::migrations::HISTORY_TABLE;
use crate::selection::TableSelectionSet;

/// Schema SQLite uses for temporary objects; never reverse engineered.
const TEMP_SCHEMA: &str = "temp";

/// Reverse engineers SQLite databases.
#[derive(Debug, Clone, Default)]
pub struct SqliteMetadataModelProvider<E: SqlExecutor = SqliteExecutor> {
    executor: E,
}

impl<E: SqlExecutor> SqliteMetadataModelProvider<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Reverse engineer through an existing connection.
    ///
    /// Useful when the connection carries state a fresh one would not, such
    /// as attached databases.
    pub fn generate_model(
        &self,
        conn: &mut RelationalConnection,
        selection: Option<&TableSelectionSet>,
    ) -> MetadataResult<DatabaseModel> {
        conn.open()?;
        let result = self.build_model(conn, selection);
        conn.close();
        result
    }

    fn build_model(
        &self,
        conn: &mut RelationalConnection,
        selection: Option<&TableSelectionSet>,
    ) -> MetadataResult<DatabaseModel> {
        let mut model = DatabaseModel::default();

        for schema in self.list_schemas(conn)? {
            for table in self.list_tables(conn, &schema)? {
                if let Some(selection) = selection {
                    if !selection.is_selected(&schema, &table)? {
                        debug!(schema = %schema, table = %table, "skipping table outside selection");
                        continue;
                    }
                }
                model.tables.push(self.table_model(conn, &schema, &table)?);
            }
        }

        info!(tables = model.tables.len(), "reverse engineered database model");
        Ok(model)
    }

    /// Schemas in `pragma_database_list` order, without `temp`.
    pub fn list_schemas(&self, conn: &mut RelationalConnection) -> MetadataResult<Vec<String>> {
        const QUERY: &str = "SELECT name FROM pragma_database_list ORDER BY seq";

        let rows = self.executor.execute_reader(conn, QUERY)?;
        let mut schemas = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = required_str(row, QUERY, "name")?;
            if name != TEMP_SCHEMA {
                schemas.push(name.to_string());
            }
        }
        Ok(schemas)
    }

    /// User tables of `schema`, sorted by name.
    ///
    /// SQLite's internal tables and the migration history table are left out.
    pub fn list_tables(
        &self,
        conn: &mut RelationalConnection,
        schema: &str,
    ) -> MetadataResult<Vec<String>> {
        const QUERY: &str = "sqlite_master";

        let sql = format!(
            "SELECT name FROM {}.sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' AND name <> {} \
             ORDER BY name",
            quote_identifier(schema),
            quote_literal(HISTORY_TABLE)
        );
        let rows = self.executor.execute_reader(conn, &sql)?;
        rows.iter()
            .map(|row| required_str(row, QUERY, "name").map(str::to_string))
            .collect()
    }

    /// Full model of one table.
    pub fn table_model(
        &self,
        conn: &mut RelationalConnection,
        schema: &str,
        table: &str,
    ) -> MetadataResult<TableModel> {
        let (columns, primary_key) = self.columns(conn, schema, table)?;
        let foreign_keys = self.foreign_keys(conn, schema, table)?;

        Ok(TableModel {
            schema: schema.to_string(),
            name: table.to_string(),
            entity_name: entity_name(table),
            columns,
            primary_key,
            foreign_keys,
        })
    }

    fn columns(
        &self,
        conn: &mut RelationalConnection,
        schema: &str,
        table: &str,
    ) -> MetadataResult<(Vec<ColumnModel>, Vec<String>)> {
        const QUERY: &str = "pragma_table_info";

        let sql = format!(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info({}, {}) ORDER BY cid",
            quote_literal(table),
            quote_literal(schema)
        );
        let rows = self.executor.execute_reader(conn, &sql)?;

        let mut columns = Vec::with_capacity(rows.len());
        let mut key_parts: Vec<(i64, String)> = Vec::new();
        for row in &rows {
            let name = required_str(row, QUERY, "name")?.to_string();
            let pk = row.get_i64("pk").unwrap_or(0);
            if pk > 0 {
                key_parts.push((pk, name.clone()));
            }

            columns.push(ColumnModel {
                position: required_i64(row, QUERY, "cid")?,
                data_type: row.get_str("type").unwrap_or_default().to_string(),
                is_nullable: row.get_i64("notnull").unwrap_or(0) == 0 && pk == 0,
                default_value: row.get_str("dflt_value").map(str::to_string),
                property_name: property_name(&name),
                name,
            });
        }

        key_parts.sort_by_key(|(seq, _)| *seq);
        let primary_key = key_parts.into_iter().map(|(_, name)| name).collect();
        Ok((columns, primary_key))
    }

    fn foreign_keys(
        &self,
        conn: &mut RelationalConnection,
        schema: &str,
        table: &str,
    ) -> MetadataResult<Vec<ForeignKeyModel>> {
        const QUERY: &str = "pragma_foreign_key_list";

        let sql = format!(
            "SELECT id, seq, \"table\", \"from\", \"to\" \
             FROM pragma_foreign_key_list({}, {}) ORDER BY id, seq",
            quote_literal(table),
            quote_literal(schema)
        );
        let rows = self.executor.execute_reader(conn, &sql)?;

        let mut by_id: BTreeMap<i64, ForeignKeyModel> = BTreeMap::new();
        let mut implicit_targets: Vec<i64> = Vec::new();
        for row in &rows {
            let id = required_i64(row, QUERY, "id")?;
            let principal = required_str(row, QUERY, "table")?;
            let from = required_str(row, QUERY, "from")?;

            let fk = by_id.entry(id).or_insert_with(|| ForeignKeyModel {
                columns: Vec::new(),
                principal_schema: schema.to_string(),
                principal_table: principal.to_string(),
                principal_columns: Vec::new(),
            });
            fk.columns.push(from.to_string());

            // A NULL target means the key references the principal's primary key
            match row.get_str("to") {
                Some(to) => fk.principal_columns.push(to.to_string()),
                None if !implicit_targets.contains(&id) => implicit_targets.push(id),
                None => {}
            }
        }

        for id in implicit_targets {
            if let Some(fk) = by_id.get_mut(&id) {
                let (_, principal_key) = self.columns(conn, &fk.principal_schema, &fk.principal_table)?;
                fk.principal_columns = principal_key;
            }
        }

        Ok(by_id.into_values().collect())
    }
}

impl<E: SqlExecutor> MetadataModelProvider for SqliteMetadataModelProvider<E> {
    fn generate_metadata_model(
        &self,
        connection_string: &str,
        selection: Option<&TableSelectionSet>,
    ) -> MetadataResult<DatabaseModel> {
        let mut conn =
            RelationalConnection::from_connection_string(connection_string)?.require_existing();
        self.generate_model(&mut conn, selection)
    }
}

fn required_str<'a>(row: &'a Row, query: &'static str, column: &'static str) -> MetadataResult<&'a str> {
    row.get_str(column)
        .ok_or(MetadataError::MissingColumn { query, column })
}

fn required_i64(row: &Row, query: &'static str, column: &'static str) -> MetadataResult<i64> {
    row.get_i64(column)
        .ok_or(MetadataError::MissingColumn { query, column })
}
