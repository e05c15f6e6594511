use gtr_schema::{Project, ProjectEnvelope, raw_project_id};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::report::{BatchReport, RowFailure};
use crate::error::{RowError, StoreError};
use crate::store::{PersistedRow, ProjectStore, RowOutcome};
use crate::utils::logging::with_pretty_json_debug;

/// Maps GtR records to `ukri_projects` rows and hands them to a store.
pub struct Persister<S> {
    store: S,
}

impl<S: ProjectStore> Persister<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Stores every decodable record of `envelope`.
    ///
    /// Row-level problems end up in the returned report; `Err` is reserved for losing the
    /// whole batch (connect, begin or commit failures).
    pub async fn save_page(&self, envelope: &ProjectEnvelope) -> Result<BatchReport, StoreError> {
        let mut report = BatchReport::default();
        let mut rows = Vec::with_capacity(envelope.project.len());

        for raw in &envelope.project {
            match decode_record(raw) {
                Ok(row) => rows.push(row),
                Err(failure) => {
                    log_failure(&failure);
                    report.failed.push(failure);
                }
            }
        }

        if rows.is_empty() {
            debug!(failed = report.failed.len(), "No storable records in page");
            return Ok(report);
        }

        let outcomes = self.store.insert_rows(&rows).await?;
        for (row, outcome) in rows.into_iter().zip(outcomes) {
            match outcome {
                RowOutcome::Inserted => report.inserted += 1,
                RowOutcome::AlreadyPresent => report.already_present += 1,
                RowOutcome::Failed(error) => {
                    let failure = RowFailure {
                        project_id: row.project_id,
                        error,
                    };
                    log_failure(&failure);
                    report.failed.push(failure);
                }
            }
        }

        Ok(report)
    }
}

fn decode_record(raw: &Value) -> Result<PersistedRow, RowFailure> {
    match Project::deserialize(raw) {
        Ok(project) => Ok(PersistedRow::from(project)),
        Err(e) => {
            with_pretty_json_debug(raw, |pretty| {
                debug!(record = %pretty, "Undecodable project record");
            });
            Err(RowFailure {
                project_id: raw_project_id(raw),
                error: RowError::Malformed(e),
            })
        }
    }
}

fn log_failure(failure: &RowFailure) {
    warn!(
        project_id = failure.project_id.as_deref().unwrap_or("<missing>"),
        error = %failure.error,
        "Insert error for project"
    );
}
