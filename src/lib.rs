pub mod config;
pub mod error;
pub mod gtr;
pub mod harvest;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{FetchError, PageError, RowError, StoreError};
pub use gtr::{GtrClient, PageSource};
pub use harvest::{Harvester, Persister, SweepPlan, SweepReport};
pub use store::{AnyProjectStore, PersistedRow, ProjectStore};
