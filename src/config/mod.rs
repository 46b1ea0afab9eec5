//! Configuration module for reveng.
//!
//! Handles named connections, table selection rules, migration and logging
//! settings, and environment variable expansion.

mod connection;
mod settings;

pub use connection::Driver;
pub use settings::{
    expand_env_vars, ConnectionSettings, LoggingSettings, MigrationSettings, SelectionSettings,
    Settings, SettingsError,
};
