use reqwest::header::ACCEPT;
use url::Url;

use super::GTR_JSON_V7;

pub struct GtrApi;

impl GtrApi {
    /// `projects_url` with the `fetchSize`/`start` window appended.
    pub fn page_url(projects_url: &Url, offset: u64, limit: u64) -> Url {
        let mut url = projects_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("fetchSize", &limit.to_string())
            .append_pair("start", &offset.to_string());
        url
    }

    pub fn build_page_request(
        client: &reqwest::Client,
        projects_url: &Url,
        offset: u64,
        limit: u64,
    ) -> Result<reqwest::Request, reqwest::Error> {
        client
            .get(Self::page_url(projects_url, offset, limit))
            .header(ACCEPT, GTR_JSON_V7)
            .build()
    }
}
