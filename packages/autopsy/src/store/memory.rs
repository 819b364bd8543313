//! In-memory storage implementation for testing and development.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;
use crate::store::{InsertOutcome, RecordStore};
use crate::types::{CaseRecord, FrontierStatus};

/// In-memory store for frontier entries and case records.
///
/// Honors the same semantics as the Postgres backend — idempotent seeding
/// and atomic case-insensitive uniqueness on insert — so pipeline tests can
/// run against it unchanged. Data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    /// Insertion-ordered so `fetch_pending` is stable, like `added_at`.
    frontier: RwLock<Vec<(String, FrontierStatus)>>,
    /// Keyed by lower-cased company name.
    cases: RwLock<HashMap<String, CaseRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All frontier entries with their status, in insertion order.
    pub fn frontier_entries(&self) -> Vec<(String, FrontierStatus)> {
        self.frontier.read().unwrap().clone()
    }

    /// All stored case records.
    pub fn case_records(&self) -> Vec<CaseRecord> {
        self.cases.read().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn seed(&self, topics: &[String]) -> Result<()> {
        let mut frontier = self.frontier.write().unwrap();
        for topic in topics {
            if !frontier.iter().any(|(q, _)| q == topic) {
                frontier.push((topic.clone(), FrontierStatus::Pending));
            }
        }
        Ok(())
    }

    async fn fetch_pending(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .frontier
            .read()
            .unwrap()
            .iter()
            .filter(|(_, status)| *status == FrontierStatus::Pending)
            .take(limit)
            .map(|(q, _)| q.clone())
            .collect())
    }

    async fn mark_completed(&self, queries: &[String]) -> Result<()> {
        let mut frontier = self.frontier.write().unwrap();
        for (query, status) in frontier.iter_mut() {
            if *status == FrontierStatus::Pending && queries.contains(query) {
                *status = FrontierStatus::Completed;
            }
        }
        Ok(())
    }

    async fn known_company_names(&self) -> Result<HashSet<String>> {
        Ok(self.cases.read().unwrap().keys().cloned().collect())
    }

    async fn insert_case(&self, record: &CaseRecord) -> Result<InsertOutcome> {
        // One write lock makes check-then-insert atomic, mirroring the
        // unique index on the Postgres side.
        let mut cases = self.cases.write().unwrap();
        let key = record.company_name.to_lowercase();
        if cases.contains_key(&key) {
            return Ok(InsertOutcome::Duplicate);
        }
        cases.insert(key, record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn reset_frontier(&self) -> Result<()> {
        self.frontier.write().unwrap().clear();
        Ok(())
    }

    async fn case_count(&self) -> Result<u64> {
        Ok(self.cases.read().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseDraft;

    fn record(name: &str) -> CaseRecord {
        CaseRecord::from_draft(
            CaseDraft {
                company_name: name.to_string(),
                failure_reason_category: "funding".to_string(),
                what_they_did: "widgets".to_string(),
                what_went_wrong: "ran out of cash".to_string(),
                key_takeaway: "watch the runway".to_string(),
                source_url: "https://example.com".to_string(),
            },
            vec![0.0; 4],
        )
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        store.seed(&["a".to_string(), "b".to_string()]).await.unwrap();
        store.seed(&["a".to_string()]).await.unwrap();

        assert_eq!(store.fetch_pending(10).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn insert_rejects_case_insensitive_duplicates() {
        let store = MemoryStore::new();
        assert_eq!(
            store.insert_case(&record("Acme")).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_case(&record("ACME")).await.unwrap(),
            InsertOutcome::Duplicate
        );
        assert_eq!(store.case_count().await.unwrap(), 1);
        assert_eq!(store.case_records()[0].company_name, "Acme");
    }

    #[tokio::test]
    async fn mark_completed_only_touches_pending() {
        let store = MemoryStore::new();
        store.seed(&["a".to_string(), "b".to_string()]).await.unwrap();
        store.mark_completed(&["a".to_string()]).await.unwrap();

        assert_eq!(store.fetch_pending(10).await.unwrap(), vec!["b"]);

        // Completing an already-completed or unknown query changes nothing.
        store
            .mark_completed(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(store.fetch_pending(10).await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn reset_clears_frontier_but_not_catalog() {
        let store = MemoryStore::new();
        store.seed(&["a".to_string()]).await.unwrap();
        store.insert_case(&record("Acme")).await.unwrap();

        store.reset_frontier().await.unwrap();

        assert!(store.fetch_pending(10).await.unwrap().is_empty());
        assert_eq!(store.case_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn known_names_are_lowercased() {
        let store = MemoryStore::new();
        store.insert_case(&record("Acme Corp")).await.unwrap();

        let names = store.known_company_names().await.unwrap();
        assert!(names.contains("acme corp"));
    }
}
