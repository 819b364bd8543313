//! Testing utilities including mock implementations.
//!
//! Deterministic, configurable stand-ins for the search and AI seams so the
//! pipeline can be exercised without network calls.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::traits::{
    ai::AI,
    searcher::{SearchHit, WebSearcher},
};
use crate::types::CaseDraft;

/// Shorthand draft constructor for tests.
pub fn draft(company_name: &str, what_went_wrong: &str) -> CaseDraft {
    CaseDraft {
        company_name: company_name.to_string(),
        failure_reason_category: "test category".to_string(),
        what_they_did: format!("{} built things", company_name),
        what_went_wrong: what_went_wrong.to_string(),
        key_takeaway: "a lesson".to_string(),
        source_url: "https://example.com/story".to_string(),
    }
}

/// Mock searcher with canned hits per query.
#[derive(Default)]
pub struct MockSearcher {
    hits: RwLock<HashMap<String, Vec<SearchHit>>>,
    failures: RwLock<HashSet<String>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned hits for a query. Unknown queries return no results.
    pub fn with_hits(self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.hits.write().unwrap().insert(query.to_string(), hits);
        self
    }

    /// Make a query fail with a search error.
    pub fn with_failure(self, query: &str) -> Self {
        self.failures.write().unwrap().insert(query.to_string());
        self
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if self.failures.read().unwrap().contains(query) {
            return Err(AgentError::Search(
                format!("mock search failure for '{}'", query).into(),
            ));
        }
        Ok(self
            .hits
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock AI with canned drafts per query and a canned suggestion response.
///
/// Embeddings are deterministic functions of the input text, so tests can
/// assert on stored vectors without caring about their values.
#[derive(Default)]
pub struct MockAI {
    drafts: RwLock<HashMap<String, Vec<CaseDraft>>>,
    suggestion: RwLock<Option<String>>,
    extraction_failures: RwLock<HashSet<String>>,
    suggestion_fails: RwLock<bool>,
    embedding_fails: RwLock<bool>,
    embedding_dim: usize,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            embedding_dim: 8,
            ..Default::default()
        }
    }

    /// Canned drafts for a query. Unknown queries extract nothing.
    pub fn with_drafts(self, query: &str, drafts: Vec<CaseDraft>) -> Self {
        self.drafts.write().unwrap().insert(query.to_string(), drafts);
        self
    }

    /// Make extraction fail for a query.
    pub fn with_extraction_failure(self, query: &str) -> Self {
        self.extraction_failures
            .write()
            .unwrap()
            .insert(query.to_string());
        self
    }

    /// Canned free-text response for query suggestions.
    pub fn with_suggestion(self, text: &str) -> Self {
        *self.suggestion.write().unwrap() = Some(text.to_string());
        self
    }

    /// Make query suggestion fail.
    pub fn with_suggestion_failure(self) -> Self {
        *self.suggestion_fails.write().unwrap() = true;
        self
    }

    /// Make every embedding call fail.
    pub fn with_embedding_failures(self) -> Self {
        *self.embedding_fails.write().unwrap() = true;
        self
    }
}

#[async_trait]
impl AI for MockAI {
    async fn extract_cases(&self, query: &str, _context: &str) -> Result<Vec<CaseDraft>> {
        if self.extraction_failures.read().unwrap().contains(query) {
            return Err(AgentError::Ai(
                format!("mock extraction failure for '{}'", query).into(),
            ));
        }
        Ok(self
            .drafts
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn suggest_queries(&self, _digest: &str) -> Result<String> {
        if *self.suggestion_fails.read().unwrap() {
            return Err(AgentError::Ai("mock generation failure".into()));
        }
        Ok(self.suggestion.read().unwrap().clone().unwrap_or_default())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if *self.embedding_fails.read().unwrap() {
            return Err(AgentError::Embedding("mock embedding failure".to_string()));
        }

        let bytes = text.as_bytes();
        Ok((0..self.embedding_dim)
            .map(|i| {
                let byte = bytes.get(i % bytes.len().max(1)).copied().unwrap_or(0) as f32;
                (byte / 127.5) - 1.0
            })
            .collect())
    }
}
