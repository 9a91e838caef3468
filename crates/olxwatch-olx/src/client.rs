use async_trait::async_trait;
use tracing::debug;

use olxwatch_core::{FetchError, Listing, ListingSource};

use crate::types::SearchResponse;

const DEFAULT_BASE_URL: &str = "https://www.olx.ua";

/// Thin client for the OLX offer-search endpoint.
///
/// Stateless apart from the connection pool inside `reqwest::Client`, so one
/// instance is shared by every scheduler firing and the interactive `/search`
/// path without locking.
pub struct OlxClient {
    client: reqwest::Client,
    base_url: String,
    limit: u32,
}

impl OlxClient {
    /// `base_url` falls back to the public host; tests point it at a local
    /// server.
    pub fn new(base_url: Option<String>, limit: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            limit,
        }
    }
}

#[async_trait]
impl ListingSource for OlxClient {
    async fn search(&self, term: &str) -> Result<Vec<Listing>, FetchError> {
        let url = format!("{}/api/v1/offers/", self.base_url);
        let limit = self.limit.to_string();

        debug!(%term, "searching OLX");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("offset", "0"),
                ("limit", limit.as_str()),
                ("query", term),
                ("currency", "UAH"),
                ("sort_by", "created_at:desc"),
                ("filter_refiners", "spell_checker"),
                ("suggest_filters", "true"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http(format!("OLX returned status {status}")));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        Ok(body.into_listings())
    }
}
