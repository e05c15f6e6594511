//! Fetch-and-persist workflow: decode a page, store it, move the window on.

mod persister;
mod report;
mod sweep;

pub use persister::Persister;
pub use report::{BatchReport, PageFailure, RowFailure, SweepReport};
pub use sweep::{Harvester, MAX_PROJECTS, PAGE_SIZE, START_OFFSET, SweepPlan};

#[cfg(test)]
pub(crate) mod testing;
