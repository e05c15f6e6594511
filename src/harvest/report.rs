use crate::error::{PageError, RowError};

/// A record that could not be stored.
#[derive(Debug)]
pub struct RowFailure {
    pub project_id: Option<String>,
    pub error: RowError,
}

/// Per-page persistence summary.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub inserted: usize,
    pub already_present: usize,
    pub failed: Vec<RowFailure>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.inserted + self.already_present + self.failed.len()
    }
}

#[derive(Debug)]
pub struct PageFailure {
    pub offset: u64,
    pub error: PageError,
}

/// Totals for one bounded sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub pages_requested: usize,
    pub failed_pages: Vec<PageFailure>,
    pub inserted: usize,
    pub already_present: usize,
    pub failed_rows: usize,
}

impl SweepReport {
    pub(crate) fn absorb(&mut self, batch: &BatchReport) {
        self.inserted += batch.inserted;
        self.already_present += batch.already_present;
        self.failed_rows += batch.failed.len();
    }

    pub fn failed_offsets(&self) -> Vec<u64> {
        self.failed_pages.iter().map(|f| f.offset).collect()
    }
}
