//! AI trait for the LLM-backed capabilities.
//!
//! The agent needs three things from a language-model provider: structured
//! case extraction from search context, free-text query suggestions for
//! frontier growth, and embeddings for the stored records. Implementations
//! own their prompts and response parsing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CaseDraft;

/// AI trait for LLM operations.
#[async_trait]
pub trait AI: Send + Sync {
    /// Extract structured case records from search context.
    ///
    /// `context` is the pre-composed, size-bounded text of the search
    /// results (see [`crate::pipeline::analyze`]). A response that fails to
    /// parse as the expected shape is an error; callers treat it as zero
    /// cases extracted.
    async fn extract_cases(&self, query: &str, context: &str) -> Result<Vec<CaseDraft>>;

    /// Ask for new search queries given a digest of recently discovered
    /// cases.
    ///
    /// Returns the raw free-text response; parsing it into query lines
    /// belongs to the caller (see [`crate::pipeline::expand`]).
    async fn suggest_queries(&self, digest: &str) -> Result<String>;

    /// Generate an embedding for text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
