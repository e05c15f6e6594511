use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{PersistedRow, RowOutcome};
use super::schema::{
    COUNT_PROJECTS, PG_INSERT_PROJECT, PG_SELECT_PROJECT, PROJECTS_INIT, statements,
};
use super::ProjectStore;
use crate::config::DatabaseConfig;
use crate::error::{RowError, StoreError};

/// Postgres backend. Every call opens its own TLS connection and closes it before returning.
pub struct PgProjectStore {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgProjectStore {
    pub fn from_config(cfg: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .database(&cfg.name)
            .username(&cfg.user)
            .password(&cfg.pass)
            .ssl_mode(PgSslMode::Require)
            .application_name(env!("CARGO_PKG_NAME"));

        Self {
            options,
            connect_timeout: cfg.connect_timeout(),
        }
    }

    async fn connect(&self) -> Result<PgConnection, StoreError> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(StoreError::Connect(e)),
            Err(_) => Err(StoreError::Timeout(self.connect_timeout)),
        }
    }
}

async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Postgres connection did not close cleanly");
    }
}

async fn insert_in_transaction(
    conn: &mut PgConnection,
    rows: &[PersistedRow],
) -> Result<Vec<RowOutcome>, StoreError> {
    let mut tx = conn.begin().await?;
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        // A failed statement poisons a Postgres transaction; the savepoint keeps it usable.
        let mut savepoint = Connection::begin(&mut *tx).await?;
        let res = sqlx::query(PG_INSERT_PROJECT)
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
impl ProjectStore for PgProjectStore {
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
        debug!(rows = rows.len(), "Postgres batch insert");
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
        let result = sqlx::query_as::<_, PersistedRow>(PG_SELECT_PROJECT)
            .bind(project_id)
            .fetch_optional(&mut conn)
            .await
            .map_err(StoreError::from);
        close(conn).await;
        result
    }
}
