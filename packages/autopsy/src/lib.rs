//! Frontier-driven research agent for failed-company post-mortems.
//!
//! The agent drains search queries from a persistent work queue (the
//! "frontier"), runs each through web search and structured LLM extraction,
//! dedups, embeds and stores the discovered cases, then feeds the round's
//! newly stored cases back into the frontier as more specific queries —
//! a self-expanding crawl bounded by a fixed iteration cap.
//!
//! # Modules
//!
//! - [`traits`] - Seams to the external capabilities (search, AI)
//! - [`store`] - Frontier + catalog storage (`PostgresStore`, `MemoryStore`)
//! - [`ai`] - OpenAI-backed implementation of the AI seam
//! - [`pipeline`] - Stage, loader, expander, and the round orchestrator
//! - [`testing`] - Mock implementations for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use autopsy::{Agent, OpenAI, PostgresStore, RunConfig, TavilySearcher};
//!
//! let store = PostgresStore::new(&database_url).await?;
//! let searcher = TavilySearcher::new(tavily_api_key);
//! let ai = OpenAI::new(openai_api_key);
//!
//! let agent = Agent::new(store, searcher, ai, RunConfig::default());
//! let summary = agent.run().await?;
//! println!("stored {} new cases", summary.cases_inserted);
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod testing;
pub mod traits;
pub mod types;

// Re-exports for a clean API
pub use ai::OpenAI;
pub use config::{RunConfig, SEED_TOPICS};
pub use error::{AgentError, Result};
pub use pipeline::{Agent, RunSummary, StageOutcome};
pub use store::{InsertOutcome, MemoryStore, PostgresStore, RecordStore};
pub use traits::{SearchHit, TavilySearcher, WebSearcher, AI};
pub use types::{CaseDraft, CaseRecord, FrontierStatus};
