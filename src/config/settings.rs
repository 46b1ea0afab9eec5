//! TOML-based configuration for reveng.
//!
//! Supports a config file (reveng.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.warehouse]
//! driver = "sqlite"
//! connection_string = "${WAREHOUSE_DB}"
//!
//! [selection]
//! include = ["main.*"]
//! exclude = ["*.audit_log"]
//!
//! [migrations]
//! directory = "migrations"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::Driver;
use crate::selection::{SelectionError, TableSelection, TableSelectionSet, INCLUSIVE_ALL};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported driver: {0}. Supported: sqlite")]
    UnsupportedDriver(String),

    #[error("Invalid table selection: {0}")]
    InvalidSelection(#[from] SelectionError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: HashMap<String, ConnectionSettings>,

    /// Tables to reverse engineer.
    pub selection: SelectionSettings,

    /// Migration scripts.
    pub migrations: MigrationSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Database driver (sqlite).
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Connection string (supports ${ENV_VAR} expansion).
    pub connection_string: String,
}

fn default_driver() -> String {
    Driver::Sqlite.as_str().to_string()
}

impl ConnectionSettings {
    /// Get the driver type.
    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        Driver::from_str(&self.driver)
    }

    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.connection_string)
    }
}

/// Table selection rules, written as `schema.table`, `table` or with `*`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub include: Vec<String>,
    /// Rules here are exclusions whether or not they carry a leading `!`.
    pub exclude: Vec<String>,
}

impl SelectionSettings {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Build the selection set, or `None` when no rules are configured.
    ///
    /// Exclusions without any inclusion start from every table.
    pub fn to_selection_set(&self) -> Result<Option<TableSelectionSet>, SettingsError> {
        if self.is_empty() {
            return Ok(None);
        }

        let mut set = TableSelectionSet::new();
        if self.include.is_empty() {
            set.add_selection(INCLUSIVE_ALL);
        }

        let includes = self
            .include
            .iter()
            .map(|rule| rule.parse::<TableSelection>())
            .collect::<Result<Vec<_>, _>>()?;
        let excludes = self
            .exclude
            .iter()
            .map(|rule| format!("!{}", rule.trim().trim_start_matches('!')).parse::<TableSelection>())
            .collect::<Result<Vec<_>, _>>()?;

        set.add_selections(includes);
        set.add_selections(excludes);
        Ok(Some(set))
    }
}

/// Migration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MigrationSettings {
    /// Directory holding `<id>.up.sql` / `<id>.down.sql` scripts.
    pub directory: PathBuf,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("migrations"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level: error, warn, info, debug, trace.
    pub level: String,

    /// Output format: text or json.
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `REVENG_CONFIG`
    /// 2. `./reveng.toml`
    /// 3. `<config dir>/reveng/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("REVENG_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("reveng.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("reveng").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Resolve a connection argument to a connection string.
    ///
    /// A configured connection name wins; anything else is taken as a
    /// connection string or database path as given.
    pub fn resolve_connection(&self, name_or_path: &str) -> Result<String, SettingsError> {
        match self.connections.get(name_or_path) {
            Some(conn) => {
                conn.driver_type()?;
                conn.resolved_connection_string()
            }
            None => Ok(name_or_path.to_string()),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a name is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    fn lookup(name: &str) -> Result<String, SettingsError> {
        env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(idx) = rest.find('$') {
        result.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}').unwrap_or(braced.len());
            result.push_str(&lookup(&braced[..end])?);
            rest = braced.get(end + 1..).unwrap_or("");
        } else {
            let end = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if end == 0 {
                result.push('$');
            } else {
                result.push_str(&lookup(&after[..end])?);
            }
            rest = &after[end..];
        }
    }

    result.push_str(rest);
    Ok(result)
}
