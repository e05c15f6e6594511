use gtr_schema::ProjectEnvelope;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::api::GtrApi;
use super::{GTR_BASE_URL, PROJECTS_PATH, PageSource, REQUEST_TIMEOUT};
use crate::error::FetchError;
use crate::utils::logging::body_preview;

/// Single-shot page fetcher. Retrying a failed window is the caller's decision.
pub struct GtrClient {
    client: reqwest::Client,
    projects_url: Url,
}

impl GtrClient {
    /// Client for the public GtR host with the fixed request timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(&GTR_BASE_URL, REQUEST_TIMEOUT)
    }

    pub fn with_base_url(base_url: &Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let projects_url = base_url.join(PROJECTS_PATH)?;
        Ok(Self {
            client,
            projects_url,
        })
    }

    pub fn projects_url(&self) -> &Url {
        &self.projects_url
    }

    pub async fn fetch_page(&self, offset: u64, limit: u64) -> Result<ProjectEnvelope, FetchError> {
        let req = GtrApi::build_page_request(&self.client, &self.projects_url, offset, limit)?;
        let start = Instant::now();
        let resp = self.client.execute(req).await?;
        let status = resp.status();

        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => format!("<failed to read body: {e}>"),
            };
            debug!(
                offset,
                limit,
                %status,
                body = %body_preview(&body),
                "GtR page request rejected"
            );
            return Err(FetchError::Request { status, body });
        }

        let bytes = resp.bytes().await?;
        let envelope: ProjectEnvelope = serde_json::from_slice(&bytes)?;

        debug!(
            offset,
            limit,
            records = envelope.project.len(),
            page = ?envelope.page,
            total_pages = ?envelope.total_pages,
            total_size = ?envelope.total_size,
            took = ?start.elapsed(),
            "GtR page received"
        );
        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl PageSource for GtrClient {
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<ProjectEnvelope, FetchError> {
        GtrClient::fetch_page(self, offset, limit).await
    }
}
