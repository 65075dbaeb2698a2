//! HTTP client for the HAL search API, including the two-query merge.

use std::time::Duration;

use crate::config::Config;
use crate::error::Error;
use crate::models::{sort_by_year_desc, Record, SearchResponse};
use crate::query::SearchQuery;

/// Production HAL search endpoint
pub const HAL_SEARCH_ENDPOINT: &str = "https://api.archives-ouvertes.fr/search/";

/// Client for fetching publication records from HAL
///
/// Stateless between calls: no caching, no retries. A failed fetch surfaces
/// immediately to the caller.
#[derive(Debug, Clone)]
pub struct HalClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HalClient {
    /// Create a client against the production endpoint
    pub fn new() -> Result<Self, Error> {
        Self::with_endpoint(HAL_SEARCH_ENDPOINT, Duration::from_secs(30))
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::with_endpoint(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Run a single search, returning records sorted by year descending
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Record>, Error> {
        let url = query.build_url(&self.endpoint)?;
        tracing::debug!(%url, "querying HAL");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("HAL response body: {}", e)))?;

        tracing::debug!(
            num_found = body.response.num_found,
            returned = body.response.docs.len(),
            "HAL query complete"
        );

        let mut docs = body.response.docs;
        sort_by_year_desc(&mut docs);
        Ok(docs)
    }

    /// Fetch records for a query, merging in comment-tag overrides
    ///
    /// Without a category this is a single search. With one, two searches run
    /// concurrently: the structured category query, and a query for records
    /// whose comment tag names the category (those are excluded from the
    /// structured query, or may not match it at all). Results are the
    /// structured set followed by the override set, unchanged: no dedup, no
    /// re-sort. Either sub-query failing fails the whole call.
    pub async fn fetch_by_category(&self, query: &SearchQuery) -> Result<Vec<Record>, Error> {
        let (Some(category), Some(override_query)) =
            (query.category_ref(), query.to_comment_override())
        else {
            return self.search(query).await;
        };

        let (mut structured, overridden) =
            tokio::try_join!(self.search(query), self.search(&override_query))?;

        tracing::debug!(
            category = category.code(),
            structured = structured.len(),
            overridden = overridden.len(),
            "merged category fetch"
        );

        structured.extend(overridden);
        Ok(structured)
    }
}
