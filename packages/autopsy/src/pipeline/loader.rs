//! Per-case loader: dedup, embed, persist.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::store::{InsertOutcome, RecordStore};
use crate::traits::ai::AI;
use crate::types::{CaseDraft, CaseRecord};

/// Dedup, embed, and persist one draft.
///
/// Returns the persisted record, or `None` when the draft was rejected, lost
/// an insert race, or hit a provider error. Never returns an error: one bad
/// case must not take down its batch.
///
/// `known_names` is a round-start snapshot and only an optimization; two
/// loaders may both pass it with the same company within a round, and the
/// store's uniqueness constraint decides the race.
pub async fn load_case<A, S>(
    draft: CaseDraft,
    known_names: &HashSet<String>,
    ai: &A,
    store: &S,
) -> Option<CaseRecord>
where
    A: AI,
    S: RecordStore,
{
    let company_name = draft.company_name.trim().to_string();
    if company_name.is_empty() || known_names.contains(&company_name.to_lowercase()) {
        return None;
    }

    if draft.what_went_wrong.trim().is_empty() {
        debug!(company = %company_name, "Draft has no failure story; skipping");
        return None;
    }

    let embedding = match ai.embed(&draft.embedding_text()).await {
        Ok(embedding) => embedding,
        Err(e) => {
            warn!(company = %company_name, error = %e, "Embedding failed");
            return None;
        }
    };

    let record = CaseRecord::from_draft(draft, embedding);
    match store.insert_case(&record).await {
        Ok(InsertOutcome::Inserted) => {
            info!(company = %record.company_name, source = %record.source_url, "Stored case");
            Some(record)
        }
        Ok(InsertOutcome::Duplicate) => {
            debug!(company = %record.company_name, "Case already in catalog");
            None
        }
        Err(e) => {
            warn!(company = %record.company_name, error = %e, "Insert failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{draft, MockAI};

    #[tokio::test]
    async fn loads_new_case() {
        let store = MemoryStore::new();
        let ai = MockAI::new();
        let known = HashSet::new();

        let record = load_case(draft("Acme", "ran out of cash"), &known, &ai, &store).await;
        assert!(record.is_some());
        assert_eq!(store.case_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_blank_company_name() {
        let store = MemoryStore::new();
        let ai = MockAI::new();
        let known = HashSet::new();

        let result = load_case(draft("   ", "ran out of cash"), &known, &ai, &store).await;
        assert!(result.is_none());
        assert_eq!(store.case_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_known_company_case_insensitively() {
        let store = MemoryStore::new();
        let ai = MockAI::new();
        let known: HashSet<String> = ["acme".to_string()].into_iter().collect();

        let result = load_case(draft("ACME", "ran out of cash"), &known, &ai, &store).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn rejects_blank_failure_story() {
        let store = MemoryStore::new();
        let ai = MockAI::new();
        let known = HashSet::new();

        let result = load_case(draft("Acme", "  "), &known, &ai, &store).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn embedding_failure_skips_the_case() {
        let store = MemoryStore::new();
        let ai = MockAI::new().with_embedding_failures();
        let known = HashSet::new();

        let result = load_case(draft("Acme", "ran out of cash"), &known, &ai, &store).await;
        assert!(result.is_none());
        assert_eq!(store.case_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_duplicate_wins_the_race_quietly() {
        let store = MemoryStore::new();
        let ai = MockAI::new();
        let known = HashSet::new();

        // Same company twice with an empty snapshot: the second insert hits
        // the store constraint, not the advisory check.
        let first = load_case(draft("Acme", "ran out of cash"), &known, &ai, &store).await;
        let second = load_case(draft("acme", "pivot failed"), &known, &ai, &store).await;

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.case_count().await.unwrap(), 1);
    }
}
