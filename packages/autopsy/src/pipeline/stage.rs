//! Per-query pipeline stage: search, then extract.

use tracing::warn;

use crate::pipeline::analyze;
use crate::traits::{ai::AI, searcher::WebSearcher};
use crate::types::CaseDraft;

/// Outcome of one query's pipeline stage.
///
/// Stages run concurrently within a round; a failing query must not take the
/// round down, so the stage never returns an error. Provider failures fold
/// into `Failed`, which contributes zero cases exactly like `Empty`.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// Extraction produced at least one draft.
    Found(Vec<CaseDraft>),

    /// The search returned no usable results, or extraction found no cases.
    Empty,

    /// Search or extraction failed for this query.
    Failed(String),
}

impl StageOutcome {
    /// Drafts carried by this outcome, if any.
    pub fn into_drafts(self) -> Vec<CaseDraft> {
        match self {
            StageOutcome::Found(drafts) => drafts,
            StageOutcome::Empty | StageOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

/// Run search and extraction for a single query.
pub async fn run_stage<W, A>(query: &str, searcher: &W, ai: &A) -> StageOutcome
where
    W: WebSearcher,
    A: AI,
{
    let hits = match searcher.search(query).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(query, error = %e, "Search failed");
            return StageOutcome::Failed(e.to_string());
        }
    };

    if hits.is_empty() {
        return StageOutcome::Empty;
    }

    match analyze::analyze(query, &hits, ai).await {
        Ok(drafts) if drafts.is_empty() => StageOutcome::Empty,
        Ok(drafts) => StageOutcome::Found(drafts),
        Err(e) => {
            warn!(query, error = %e, "Case extraction failed");
            StageOutcome::Failed(e.to_string())
        }
    }
}
