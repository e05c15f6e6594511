use std::time::Instant;
use tracing::{error, info};

use super::persister::Persister;
use super::report::{BatchReport, PageFailure, SweepReport};
use crate::error::PageError;
use crate::gtr::PageSource;
use crate::store::ProjectStore;

pub const START_OFFSET: u64 = 0;
pub const PAGE_SIZE: u64 = 100;
pub const MAX_PROJECTS: u64 = 1000;

/// Bounds of a sweep. The window advances by `limit` until `max_projects` is reached,
/// independent of how many records the API actually returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlan {
    pub start: u64,
    pub limit: u64,
    pub max_projects: u64,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            start: START_OFFSET,
            limit: PAGE_SIZE,
            max_projects: MAX_PROJECTS,
        }
    }
}

impl SweepPlan {
    /// Offsets the sweep will request, in order.
    pub fn offsets(&self) -> impl Iterator<Item = u64> + use<> {
        let Self {
            start,
            limit,
            max_projects,
        } = *self;
        let limit = limit.max(1);
        std::iter::successors(Some(start), move |offset| offset.checked_add(limit))
            .take_while(move |offset| *offset < max_projects)
    }
}

/// Drives one bounded, sequential sweep: fetch a window, persist it, advance.
pub struct Harvester<P, S> {
    source: P,
    persister: Persister<S>,
    plan: SweepPlan,
}

impl<P: PageSource, S: ProjectStore> Harvester<P, S> {
    pub fn new(source: P, store: S, plan: SweepPlan) -> Self {
        Self {
            source,
            persister: Persister::new(store),
            plan,
        }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn store(&self) -> &S {
        self.persister.store()
    }

    /// Every window is attempted exactly once; failures are logged and recorded, never retried.
    pub async fn run(&self) -> SweepReport {
        let SweepPlan {
            start,
            limit,
            max_projects,
        } = self.plan;
        info!(start, limit, max_projects, "Starting UKRI data fetch");

        let started = Instant::now();
        let mut report = SweepReport::default();

        for offset in self.plan.offsets() {
            info!(
                offset,
                "Fetching projects {} to {}",
                offset,
                offset.saturating_add(limit.max(1)) - 1
            );
            report.pages_requested += 1;

            match self.harvest_page(offset).await {
                Ok(batch) => {
                    info!(
                        offset,
                        inserted = batch.inserted,
                        already_present = batch.already_present,
                        failed = batch.failed.len(),
                        "Page stored"
                    );
                    report.absorb(&batch);
                }
                Err(e) => {
                    error!(offset, error = %e, "Error at offset {}", offset);
                    report.failed_pages.push(PageFailure { offset, error: e });
                }
            }
        }

        info!(
            pages = report.pages_requested,
            failed_pages = report.failed_pages.len(),
            inserted = report.inserted,
            already_present = report.already_present,
            failed_rows = report.failed_rows,
            took = ?started.elapsed(),
            "Fetch complete."
        );
        report
    }

    async fn harvest_page(&self, offset: u64) -> Result<BatchReport, PageError> {
        let envelope = self.source.fetch_page(offset, self.plan.limit).await?;
        Ok(self.persister.save_page(&envelope).await?)
    }
}
