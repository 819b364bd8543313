//! Core domain types: frontier entries and case records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a frontier entry.
///
/// Entries are created `Pending` and move to `Completed` exactly once, when
/// the pipeline run for their query finishes. There is no failure status: a
/// query that yielded nothing is still done and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierStatus {
    Pending,
    Completed,
}

impl FrontierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrontierStatus::Pending => "pending",
            FrontierStatus::Completed => "completed",
        }
    }
}

/// A case as the extraction service produced it, before dedup, embedding,
/// and persistence.
///
/// Field names double as the wire shape of the structured extraction output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDraft {
    pub company_name: String,
    pub failure_reason_category: String,
    pub what_they_did: String,
    pub what_went_wrong: String,
    pub key_takeaway: String,
    pub source_url: String,
}

impl CaseDraft {
    /// Text the embedding is computed from.
    ///
    /// Order-sensitive concatenation; `what_went_wrong` appears twice to
    /// weight the vector toward the failure story itself.
    pub fn embedding_text(&self) -> String {
        [
            self.failure_reason_category.as_str(),
            self.what_they_did.as_str(),
            self.what_went_wrong.as_str(),
            self.key_takeaway.as_str(),
            self.what_went_wrong.as_str(),
        ]
        .join("\n")
    }
}

/// A persisted post-mortem record.
///
/// At most one record exists per company name (case-insensitive) for the
/// lifetime of the catalog; records are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: Uuid,
    pub company_name: String,
    pub failure_reason_category: String,
    pub what_they_did: String,
    pub what_went_wrong: String,
    pub key_takeaway: String,
    pub source_url: String,
    pub embedding: Vec<f32>,
    pub discovered_at: DateTime<Utc>,
}

impl CaseRecord {
    /// Build a record from a draft and its computed embedding.
    pub fn from_draft(draft: CaseDraft, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: draft.company_name.trim().to_string(),
            failure_reason_category: draft.failure_reason_category,
            what_they_did: draft.what_they_did,
            what_went_wrong: draft.what_went_wrong,
            key_takeaway: draft.key_takeaway,
            source_url: draft.source_url,
            embedding,
            discovered_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CaseDraft {
        CaseDraft {
            company_name: "Acme".to_string(),
            failure_reason_category: "ran out of money".to_string(),
            what_they_did: "sold anvils".to_string(),
            what_went_wrong: "no customers".to_string(),
            key_takeaway: "validate demand".to_string(),
            source_url: "https://example.com/acme".to_string(),
        }
    }

    #[test]
    fn embedding_text_repeats_what_went_wrong() {
        let text = draft().embedding_text();
        assert_eq!(text.matches("no customers").count(), 2);
        assert!(text.starts_with("ran out of money\n"));
        assert!(text.ends_with("\nno customers"));
    }

    #[test]
    fn from_draft_trims_company_name() {
        let mut d = draft();
        d.company_name = "  Acme  ".to_string();
        let record = CaseRecord::from_draft(d, vec![0.1, 0.2]);
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.embedding, vec![0.1, 0.2]);
    }
}
