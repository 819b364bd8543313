//! Web searcher trait for query-driven discovery.
//!
//! Abstracts over search providers so the pipeline can run against a mock
//! in tests. "No results" is an `Ok` empty list, never an error; transport
//! and provider failures surface as `AgentError::Search` and are contained
//! by the pipeline stage that issued the query.

use async_trait::async_trait;

use crate::error::{AgentError, Result};

/// A single content-bearing search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The discovered URL.
    pub url: String,

    /// Extracted page text from the search provider.
    pub content: String,

    /// Title of the page, if the provider supplied one.
    pub title: Option<String>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Web search trait for open-world discovery.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web for content relevant to the query.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// Tavily-backed searcher.
///
/// Uses advanced search depth by default; post-mortem stories tend to live in
/// long-form articles that basic depth misses.
pub struct TavilySearcher {
    client: tavily_client::TavilyClient,
    search_depth: String,
    max_results: usize,
}

impl TavilySearcher {
    /// Create a new Tavily searcher.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: tavily_client::TavilyClient::new(api_key),
            search_depth: "advanced".to_string(),
            max_results: 7,
        }
    }

    /// Set search depth ("basic" or "advanced").
    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    /// Set the number of results requested per query.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .search(query, &self.search_depth, self.max_results)
            .await
            .map_err(|e| AgentError::Search(Box::new(e)))?;

        // Hits without content can't feed extraction; drop them here.
        Ok(response
            .results
            .into_iter()
            .filter_map(|r| {
                let content = r.content.filter(|c| !c.trim().is_empty())?;
                let mut hit = SearchHit::new(r.url, content);
                if let Some(title) = r.title {
                    hit = hit.with_title(title);
                }
                Some(hit)
            })
            .collect())
    }
}
