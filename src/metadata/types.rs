//! The reverse-engineered database model.

use serde::{Deserialize, Serialize};

/// Every selected table of a database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseModel {
    pub tables: Vec<TableModel>,
}

impl DatabaseModel {
    /// Look up a table by schema and name.
    pub fn table(&self, schema: &str, name: &str) -> Option<&TableModel> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }

    /// Qualified `schema.table` names in model order.
    pub fn qualified_names(&self) -> Vec<String> {
        self.tables.iter().map(TableModel::qualified_name).collect()
    }
}

/// One table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    pub schema: String,
    pub name: String,
    /// Singular PascalCase name for the mapped entity.
    pub entity_name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnModel>,
    /// Primary key columns in key order.
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyModel>,
}

impl TableModel {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnModel> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// One column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnModel {
    pub name: String,
    /// Ordinal position (0-based).
    pub position: i64,
    /// Declared type, empty when the column has none.
    pub data_type: String,
    pub is_nullable: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// PascalCase name for the mapped property.
    pub property_name: String,
}

/// A foreign key from this table to a principal table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyModel {
    /// Dependent columns, in key order.
    pub columns: Vec<String>,
    pub principal_schema: String,
    pub principal_table: String,
    /// Referenced columns, matching `columns` position by position.
    pub principal_columns: Vec<String>,
}
