//! Frontier expansion: turn newly stored cases into new search queries.

use tracing::{info, warn};

use crate::store::RecordStore;
use crate::traits::ai::AI;
use crate::types::CaseRecord;

/// At most this many cases go into the expansion digest.
const DIGEST_CASES: usize = 10;

/// Build the digest of recent cases handed to the query generator.
pub fn build_digest(cases: &[CaseRecord]) -> String {
    cases
        .iter()
        .take(DIGEST_CASES)
        .map(|case| format!("- {}: {}", case.company_name, case.what_went_wrong))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the query generator's free-text response into query strings.
///
/// Contract: split on newlines, trim, drop blank lines and lines that look
/// like list-markup bullets.
pub fn parse_query_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            !line.starts_with('-') && !line.starts_with('*') && !line.starts_with('•')
        })
        .map(str::to_string)
        .collect()
}

/// Derive new queries from the round's inserted cases and enqueue them.
///
/// Best-effort: every failure on this path is logged and swallowed, so
/// expansion can never block a round from completing.
pub async fn expand_frontier<A, S>(new_cases: &[CaseRecord], ai: &A, store: &S)
where
    A: AI,
    S: RecordStore,
{
    if new_cases.is_empty() {
        return;
    }

    let digest = build_digest(new_cases);
    let response = match ai.suggest_queries(&digest).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Query generation failed; skipping expansion");
            return;
        }
    };

    let queries = parse_query_lines(&response);
    if queries.is_empty() {
        warn!("Query generation returned no usable lines");
        return;
    }

    match store.seed(&queries).await {
        Ok(()) => info!(count = queries.len(), "Added new queries to the frontier"),
        Err(e) => warn!(error = %e, "Failed to enqueue new queries"),
    }
}
