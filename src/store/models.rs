use gtr_schema::Project;
use sqlx::FromRow;

use crate::error::RowError;

/// Fixed-column shape of one `ukri_projects` row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PersistedRow {
    /// `None` only for malformed upstream records; the insert is then rejected by the NOT NULL key.
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    #[sqlx(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub funder: Option<String>,
}

impl From<Project> for PersistedRow {
    fn from(project: Project) -> Self {
        let funder = project.lead_funder().map(str::to_owned);
        Self {
            project_id: project.id,
            title: project.title,
            status: project.status,
            abstract_text: project.abstract_text,
            funder,
        }
    }
}

/// Result of one insert attempt.
#[derive(Debug)]
pub enum RowOutcome {
    Inserted,
    /// The id was already stored; the existing row is untouched.
    AlreadyPresent,
    Failed(RowError),
}

impl RowOutcome {
    pub(crate) fn from_rows_affected(rows_affected: u64) -> Self {
        if rows_affected == 0 {
            RowOutcome::AlreadyPresent
        } else {
            RowOutcome::Inserted
        }
    }
}
