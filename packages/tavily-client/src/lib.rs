//! Pure Tavily Search REST API client.
//!
//! A minimal client for the Tavily search API with no domain-specific logic.
//! An empty result list is a valid, non-error response.
//!
//! # Example
//!
//! ```rust,ignore
//! use tavily_client::TavilyClient;
//!
//! let client = TavilyClient::new("tvly-...");
//!
//! let response = client.search("failed fintech startups", "advanced", 7).await?;
//! for result in &response.results {
//!     println!("{}", result.url);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, TavilyError};
pub use types::{SearchRequest, SearchResponse, SearchResultItem};

use std::time::Duration;

const BASE_URL: &str = "https://api.tavily.com";

/// Timeout for a single search request. Advanced-depth searches can take a
/// while; anything past this is treated as a failed call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Run a search. `search_depth` is `"basic"` or `"advanced"`.
    pub async fn search(
        &self,
        query: &str,
        search_depth: &str,
        max_results: usize,
    ) -> Result<SearchResponse> {
        let request = SearchRequest {
            query: query.to_string(),
            search_depth: search_depth.to_string(),
            max_results,
        };

        let resp = self
            .client
            .post(format!("{}/search", BASE_URL))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TavilyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let response: SearchResponse = resp.json().await?;
        tracing::debug!(query, count = response.results.len(), "Tavily search complete");

        Ok(response)
    }
}
