//! Context composition and structured case extraction for one query.

use tracing::debug;

use crate::error::Result;
use crate::traits::{ai::AI, searcher::SearchHit};
use crate::types::CaseDraft;

/// Upper bound on the composed context, in characters. Keeps the extraction
/// request inside the model's input budget; overflow is cut, not split into
/// a second request.
pub const MAX_CONTEXT_CHARS: usize = 100_000;

/// Compose the extraction context from search hits.
///
/// Each hit contributes a `Source URL` line so the model can attribute every
/// extracted case back to a concrete page.
pub fn build_context(hits: &[SearchHit]) -> String {
    let full = hits
        .iter()
        .map(|hit| format!("Source URL: {}\nContent: {}", hit.url, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    truncate_chars(full, MAX_CONTEXT_CHARS)
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

/// Run structured extraction for one query over its search hits.
pub async fn analyze<A: AI>(query: &str, hits: &[SearchHit], ai: &A) -> Result<Vec<CaseDraft>> {
    let context = build_context(hits);
    debug!(
        query,
        hits = hits.len(),
        context_chars = context.chars().count(),
        "Running case extraction"
    );

    ai.extract_cases(query, &context).await
}
