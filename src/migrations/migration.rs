//! Migration scripts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::error::{MigrationError, MigrationResult};

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";

/// A named pair of forward and backward scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: String,
    pub up: String,
    pub down: String,
}

impl Migration {
    pub fn new(
        id: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> MigrationResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(MigrationError::EmptyMigrationId);
        }
        Ok(Self {
            id,
            up: up.into(),
            down: down.into(),
        })
    }

    /// SHA-256 of the up script as lowercase hex.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.up.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Load `<id>.up.sql` / `<id>.down.sql` pairs from a directory, ordered by id.
    ///
    /// A missing down script is treated as empty. Other files are ignored.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> MigrationResult<Vec<Migration>> {
        let mut ups: BTreeMap<String, String> = BTreeMap::new();
        let mut downs: BTreeMap<String, String> = BTreeMap::new();

        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if let Some(id) = file_name.strip_suffix(UP_SUFFIX) {
                ups.insert(id.to_string(), fs::read_to_string(&path)?);
            } else if let Some(id) = file_name.strip_suffix(DOWN_SUFFIX) {
                downs.insert(id.to_string(), fs::read_to_string(&path)?);
            }
        }

        if let Some(orphan) = downs.keys().find(|id| !ups.contains_key(*id)) {
            return Err(MigrationError::MissingUpScript(orphan.clone()));
        }

        ups.into_iter()
            .map(|(id, up)| {
                let down = downs.remove(&id).unwrap_or_default();
                Migration::new(id, up, down)
            })
            .collect()
    }
}
