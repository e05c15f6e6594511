use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::deserialize_string_lax;
use crate::error::ConfigError;

/// Storage connection parameters.
///
/// Environment: `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASS`, and optionally
/// `DB_SQLITE_PATH` to write into a local SQLite file instead of Postgres.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub user: String,

    #[serde(default, deserialize_with = "deserialize_string_lax", skip_serializing)]
    pub pass: String,

    /// When set, Postgres settings are ignored.
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Run `CREATE TABLE IF NOT EXISTS ukri_projects` before the sweep.
    #[serde(default = "default_apply_schema")]
    pub apply_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    Sqlite(PathBuf),
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            name: String::new(),
            user: String::new(),
            pass: String::new(),
            sqlite_path: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            apply_schema: default_apply_schema(),
        }
    }
}

impl DatabaseConfig {
    pub fn backend(&self) -> DatabaseBackend {
        match &self.sqlite_path {
            Some(path) => DatabaseBackend::Sqlite(path.clone()),
            None => DatabaseBackend::Postgres,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.backend() != DatabaseBackend::Postgres {
            return Ok(());
        }
        for (key, value) in [
            ("DB_HOST", &self.host),
            ("DB_NAME", &self.name),
            ("DB_USER", &self.user),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{key} must be set and non-empty")));
            }
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    5432
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_apply_schema() -> bool {
    true
}
