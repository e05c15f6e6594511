//! In-memory fakes for the harvest loop.

use gtr_schema::ProjectEnvelope;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{FetchError, RowError, StoreError};
use crate::gtr::PageSource;
use crate::store::{PersistedRow, ProjectStore, RowOutcome};

/// Insert-skip store keyed by project id; a missing id is rejected like a NOT NULL key.
#[derive(Default)]
pub(crate) struct MemoryStore {
    rows: Mutex<BTreeMap<String, PersistedRow>>,
    batches: AtomicUsize,
    fail_batches: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub(crate) fn row(&self, id: &str) -> Option<PersistedRow> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ProjectStore for MemoryStore {
    async fn apply_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_rows(&self, rows: &[PersistedRow]) -> Result<Vec<RowOutcome>, StoreError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::from_secs(10)));
        }

        let mut stored = self.rows.lock().unwrap();
        let outcomes = rows
            .iter()
            .map(|row| match &row.project_id {
                None => RowOutcome::Failed(RowError::Storage(sqlx::Error::Protocol(
                    "null value in column \"project_id\"".to_string(),
                ))),
                Some(id) if stored.contains_key(id) => RowOutcome::AlreadyPresent,
                Some(id) => {
                    stored.insert(id.clone(), row.clone());
                    RowOutcome::Inserted
                }
            })
            .collect();
        Ok(outcomes)
    }

    async fn count_rows(&self) -> Result<i64, StoreError> {
        Ok(i64::try_from(self.len()).unwrap_or(i64::MAX))
    }

    async fn get_row(&self, project_id: &str) -> Result<Option<PersistedRow>, StoreError> {
        Ok(self.row(project_id))
    }
}

/// Serves `total` synthetic projects and records every requested offset.
pub(crate) struct ScriptedSource {
    total: u64,
    failing_offsets: HashSet<u64>,
    calls: Mutex<Vec<(u64, u64)>>,
}

impl ScriptedSource {
    pub(crate) fn new(total: u64) -> Self {
        Self {
            total,
            failing_offsets: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_at(mut self, offset: u64) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    pub(crate) fn offsets(&self) -> Vec<u64> {
        self.calls.lock().unwrap().iter().map(|(o, _)| *o).collect()
    }
}

#[async_trait::async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<ProjectEnvelope, FetchError> {
        self.calls.lock().unwrap().push((offset, limit));
        if self.failing_offsets.contains(&offset) {
            return Err(FetchError::Request {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "maintenance".to_string(),
            });
        }

        let end = (offset + limit).min(self.total);
        let project = (offset..end)
            .map(|i| {
                json!({
                    "id": format!("PRJ-{i:05}"),
                    "title": format!("Project {i}"),
                    "status": "Active",
                    "funders": [{"name": "UKRI"}]
                })
            })
            .collect();
        Ok(ProjectEnvelope {
            project,
            total_size: Some(self.total),
            ..Default::default()
        })
    }
}
