use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Connection, SqliteConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{PersistedRow, RowOutcome};
use super::schema::{
    COUNT_PROJECTS, PROJECTS_INIT, SQLITE_INSERT_PROJECT, SQLITE_SELECT_PROJECT, statements,
};
use super::ProjectStore;
use crate::error::{RowError, StoreError};

/// Local SQLite backend with the same per-call connection discipline as Postgres.
pub struct SqliteProjectStore {
    path: PathBuf,
    options: SqliteConnectOptions,
    connect_timeout: Duration,
}

impl SqliteProjectStore {
    pub fn new(path: impl AsRef<Path>, connect_timeout: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        Self {
            path,
            options,
            connect_timeout,
        }
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        match tokio::time::timeout(
            self.connect_timeout,
            SqliteConnection::connect_with(&self.options),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(StoreError::Connect(e)),
            Err(_) => Err(StoreError::Timeout(self.connect_timeout)),
        }
    }
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "SQLite connection did not close cleanly");
    }
}

async fn insert_in_transaction(
    conn: &mut SqliteConnection,
    rows: &[PersistedRow],
) -> Result<Vec<RowOutcome>, StoreError> {
    let mut tx = conn.begin().await?;
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        let mut savepoint = Connection::begin(&mut *tx).await?;
        let res = sqlx::query(SQLITE_INSERT_PROJECT)
            .bind(row.project_id.as_deref())
            .bind(row.title.as_deref())
            .bind(row.status.as_deref())
            .bind(row.abstract_text.as_deref())
            .bind(row.funder.as_deref())
            .execute(&mut *savepoint)
            .await;

        match res {
            Ok(done) => {
                savepoint.commit().await?;
                outcomes.push(RowOutcome::from_rows_affected(done.rows_affected()));
            }
            Err(e) => {
                savepoint.rollback().await?;
                outcomes.push(RowOutcome::Failed(RowError::Storage(e)));
            }
        }
    }

    tx.commit().await?;
    Ok(outcomes)
}

#[async_trait::async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn apply_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let mut result = Ok(());
        for stmt in statements(PROJECTS_INIT) {
            if let Err(e) = sqlx::query(stmt).execute(&mut conn).await {
                result = Err(StoreError::Database(e));
                break;
            }
        }
        close(conn).await;
        result
    }

    async fn insert_rows(&self, rows: &[PersistedRow]) -> Result<Vec<RowOutcome>, StoreError> {
        let mut conn = self.connect().await?;
        debug!(rows = rows.len(), path = %self.path.display(), "SQLite batch insert");
        let result = insert_in_transaction(&mut conn, rows).await;
        close(conn).await;
        result
    }

    async fn count_rows(&self) -> Result<i64, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_scalar::<_, i64>(COUNT_PROJECTS)
            .fetch_one(&mut conn)
            .await
            .map_err(StoreError::from);
        close(conn).await;
        result
    }

    async fn get_row(&self, project_id: &str) -> Result<Option<PersistedRow>, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, PersistedRow>(SQLITE_SELECT_PROJECT)
            .bind(project_id)
            .fetch_optional(&mut conn)
            .await
            .map_err(StoreError::from);
        close(conn).await;
        result
    }
}
