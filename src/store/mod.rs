//! Storage for harvested projects.
//!
//! Layout:
//! - `models.rs`: row shape and per-row insert outcome
//! - `schema.rs`: DDL and statements for `ukri_projects`
//! - `postgres.rs` / `sqlite.rs`: backends, one fresh connection per call

pub mod models;
pub mod schema;

mod postgres;
mod sqlite;

pub use models::{PersistedRow, RowOutcome};
pub use postgres::PgProjectStore;
pub use sqlite::SqliteProjectStore;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::error::StoreError;

#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Creates `ukri_projects` if it does not exist.
    async fn apply_schema(&self) -> Result<(), StoreError>;

    /// Inserts `rows` in one transaction, skipping ids that already exist.
    ///
    /// Returns one outcome per input row, in order. A row-level failure is reported in its
    /// outcome and does not affect the others; `Err` means the batch as a whole was lost.
    async fn insert_rows(&self, rows: &[PersistedRow]) -> Result<Vec<RowOutcome>, StoreError>;

    async fn count_rows(&self) -> Result<i64, StoreError>;

    async fn get_row(&self, project_id: &str) -> Result<Option<PersistedRow>, StoreError>;
}

/// Backend chosen from `DatabaseConfig` at startup.
pub enum AnyProjectStore {
    Postgres(PgProjectStore),
    Sqlite(SqliteProjectStore),
}

impl AnyProjectStore {
    pub fn from_config(cfg: &DatabaseConfig) -> Self {
        match cfg.backend() {
            DatabaseBackend::Postgres => AnyProjectStore::Postgres(PgProjectStore::from_config(cfg)),
            DatabaseBackend::Sqlite(path) => {
                AnyProjectStore::Sqlite(SqliteProjectStore::new(path, cfg.connect_timeout()))
            }
        }
    }

    fn inner(&self) -> &dyn ProjectStore {
        match self {
            AnyProjectStore::Postgres(store) => store,
            AnyProjectStore::Sqlite(store) => store,
        }
    }
}

#[async_trait::async_trait]
impl ProjectStore for AnyProjectStore {
    async fn apply_schema(&self) -> Result<(), StoreError> {
        self.inner().apply_schema().await
    }

    async fn insert_rows(&self, rows: &[PersistedRow]) -> Result<Vec<RowOutcome>, StoreError> {
        self.inner().insert_rows(rows).await
    }

    async fn count_rows(&self) -> Result<i64, StoreError> {
        self.inner().count_rows().await
    }

    async fn get_row(&self, project_id: &str) -> Result<Option<PersistedRow>, StoreError> {
        self.inner().get_row(project_id).await
    }
}
