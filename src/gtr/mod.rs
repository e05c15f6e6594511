//! Gateway to Research (GtR) listing client.

mod api;
mod client;

pub use api::GtrApi;
pub use client::GtrClient;

use crate::error::FetchError;
use gtr_schema::ProjectEnvelope;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

pub const GTR_JSON_V7: &str = "application/vnd.rcuk.gtr.json-v7";

pub const PROJECTS_PATH: &str = "/gtr/api/projects";

/// Upper bound on one page request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) static GTR_BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://gtr.ukri.org").expect("invalid fixed GtR base URL"));

/// Anything that can hand out one offset/limit window of projects.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<ProjectEnvelope, FetchError>;
}
