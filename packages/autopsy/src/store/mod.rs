//! Persistent storage for the frontier work queue and the case catalog.
//!
//! The store owns all durable state; every other component holds only
//! transient copies during a round. The store performs no retries of its
//! own — transient failures surface as `AgentError::Store` and retry policy
//! belongs to the caller.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CaseRecord;

/// Outcome of a case insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was persisted.
    Inserted,

    /// A record with the same company name (case-insensitive) already
    /// exists; nothing was written.
    Duplicate,
}

/// Storage contract for frontier entries and case records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert each topic as a pending frontier entry. Re-seeding a query
    /// that already exists (pending or completed) is a no-op.
    async fn seed(&self, topics: &[String]) -> Result<()>;

    /// Up to `limit` currently-pending queries, oldest first. Does not
    /// mutate status.
    async fn fetch_pending(&self, limit: usize) -> Result<Vec<String>>;

    /// Mark queries completed. A query that is not currently pending is
    /// left unaffected.
    async fn mark_completed(&self, queries: &[String]) -> Result<()>;

    /// Lower-cased company name of every stored case.
    ///
    /// Snapshotted once per round as an advisory dedup filter; the
    /// uniqueness constraint on inserts remains the final authority.
    async fn known_company_names(&self) -> Result<HashSet<String>>;

    /// Persist a case. Rejects — never overwrites — on a company-name
    /// collision.
    async fn insert_case(&self, record: &CaseRecord) -> Result<InsertOutcome>;

    /// Delete every frontier entry. Used only at the start of a fresh run.
    async fn reset_frontier(&self) -> Result<()>;

    /// Number of cases in the catalog.
    async fn case_count(&self) -> Result<u64>;
}

// A shared handle is as good as the store itself; lets the caller keep a
// reference to a store it hands to the agent.
#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn seed(&self, topics: &[String]) -> Result<()> {
        (**self).seed(topics).await
    }

    async fn fetch_pending(&self, limit: usize) -> Result<Vec<String>> {
        (**self).fetch_pending(limit).await
    }

    async fn mark_completed(&self, queries: &[String]) -> Result<()> {
        (**self).mark_completed(queries).await
    }

    async fn known_company_names(&self) -> Result<HashSet<String>> {
        (**self).known_company_names().await
    }

    async fn insert_case(&self, record: &CaseRecord) -> Result<InsertOutcome> {
        (**self).insert_case(record).await
    }

    async fn reset_frontier(&self) -> Result<()> {
        (**self).reset_frontier().await
    }

    async fn case_count(&self) -> Result<u64> {
        (**self).case_count().await
    }
}
