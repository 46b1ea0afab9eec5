//! Reference-counted SQLite connection.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::trace;

use super::error::{ExecutorError, ExecutorResult};

/// Where a connection's database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSource {
    /// A database file on disk.
    File(PathBuf),
    /// A private in-memory database.
    Memory,
}

impl ConnectionSource {
    /// Parse a connection string.
    ///
    /// Accepts a bare path, `:memory:`, or `key=value;` pairs where the path
    /// comes from `Data Source`, `DataSource` or `Filename`.
    pub fn parse(connection_string: &str) -> ExecutorResult<Self> {
        let s = connection_string.trim();
        if s.is_empty() {
            return Err(ExecutorError::EmptyConnectionString);
        }

        let path = if s.contains('=') {
            s.split(';')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| {
                    matches!(
                        key.trim().to_lowercase().as_str(),
                        "data source" | "datasource" | "filename"
                    )
                })
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
                .ok_or(ExecutorError::EmptyConnectionString)?
        } else {
            s
        };

        if path == ":memory:" {
            Ok(ConnectionSource::Memory)
        } else {
            Ok(ConnectionSource::File(PathBuf::from(path)))
        }
    }
}

/// A connection that may be opened and closed repeatedly.
///
/// `open` and `close` nest: the handle is established by the first `open`
/// and released when the matching last `close` runs. An in-memory database
/// keeps its handle across closes, since releasing it would discard the
/// database itself.
///
/// A missing database file is created on first open unless
/// [`require_existing`](Self::require_existing) was called.
#[derive(Debug)]
pub struct RelationalConnection {
    source: ConnectionSource,
    handle: Option<Connection>,
    open_count: usize,
    create_if_missing: bool,
}

impl RelationalConnection {
    pub fn new(source: ConnectionSource) -> Self {
        Self {
            source,
            handle: None,
            open_count: 0,
            create_if_missing: true,
        }
    }

    /// Fail to open instead of creating the database file when it is missing.
    pub fn require_existing(mut self) -> Self {
        self.create_if_missing = false;
        self
    }

    /// Connection to a database file.
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(ConnectionSource::File(path.as_ref().to_path_buf()))
    }

    /// Connection to a fresh in-memory database.
    pub fn in_memory() -> Self {
        Self::new(ConnectionSource::Memory)
    }

    /// Connection described by a connection string (see [`ConnectionSource::parse`]).
    pub fn from_connection_string(connection_string: &str) -> ExecutorResult<Self> {
        Ok(Self::new(ConnectionSource::parse(connection_string)?))
    }

    pub fn source(&self) -> &ConnectionSource {
        &self.source
    }

    pub fn is_open(&self) -> bool {
        self.open_count > 0
    }

    /// Open the connection, or bump the nesting count if already open.
    pub fn open(&mut self) -> ExecutorResult<()> {
        if self.handle.is_none() {
            let conn = match &self.source {
                ConnectionSource::File(path) if self.create_if_missing => Connection::open(path)?,
                ConnectionSource::File(path) => Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_WRITE
                        | OpenFlags::SQLITE_OPEN_URI
                        | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?,
                ConnectionSource::Memory => Connection::open_in_memory()?,
            };
            trace!(source = ?self.source, "opened connection");
            self.handle = Some(conn);
        }
        self.open_count += 1;
        Ok(())
    }

    /// Undo one `open`. Extra calls on a closed connection do nothing.
    pub fn close(&mut self) {
        if self.open_count == 0 {
            return;
        }
        self.open_count -= 1;

        if self.open_count == 0 && matches!(self.source, ConnectionSource::File(_)) {
            self.handle = None;
            trace!(source = ?self.source, "closed connection");
        }
    }

    /// Borrow the live SQLite handle.
    pub fn handle(&self) -> ExecutorResult<&Connection> {
        if !self.is_open() {
            return Err(ExecutorError::NotOpen);
        }
        self.handle.as_ref().ok_or(ExecutorError::NotOpen)
    }
}
