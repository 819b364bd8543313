//! Round-based orchestrator.
//!
//! Drives the loop: drain a batch from the frontier, run a pipeline stage
//! per query, load the resulting drafts, mark the batch completed, expand
//! the frontier from what was actually stored, repeat. Terminates when the
//! frontier drains or the iteration cap is reached — the cap is what bounds
//! an otherwise self-feeding crawl.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::Result;
use crate::pipeline::{expand, loader, stage};
use crate::store::RecordStore;
use crate::traits::{ai::AI, searcher::WebSearcher};
use crate::types::CaseRecord;

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rounds that actually ran.
    pub rounds: usize,

    /// Cases newly stored across the run.
    pub cases_inserted: usize,
}

/// The round-driven research agent.
pub struct Agent<S, W, A> {
    store: S,
    searcher: W,
    ai: A,
    config: RunConfig,

    /// Admission gate for external calls, shared by stages and loaders.
    /// Sized independently of the batch so provider rate limits hold even
    /// when a round carries many drafts.
    gate: Arc<Semaphore>,
}

impl<S, W, A> Agent<S, W, A>
where
    S: RecordStore,
    W: WebSearcher,
    A: AI,
{
    pub fn new(store: S, searcher: W, ai: A, config: RunConfig) -> Self {
        let gate = Arc::new(Semaphore::new(config.concurrency));
        Self {
            store,
            searcher,
            ai,
            config,
            gate,
        }
    }

    /// Run to completion: optional reset, seed, then iterate until the
    /// frontier drains or the iteration cap is reached.
    ///
    /// Only startup store failures (reset/seed) surface as errors. Once
    /// rounds are underway, store hiccups end the run early but the summary
    /// of what was stored is still returned.
    pub async fn run(&self) -> Result<RunSummary> {
        if self.config.reset_frontier {
            info!("Resetting frontier for a fresh run");
            self.store.reset_frontier().await?;
        }
        self.store.seed(&self.config.seed_topics).await?;

        let mut summary = RunSummary {
            rounds: 0,
            cases_inserted: 0,
        };

        for round in 1..=self.config.max_iterations {
            // Advisory snapshot for this round's loaders. A failure here is
            // survivable: the insert constraint still holds the line.
            let known = match self.store.known_company_names().await {
                Ok(known) => known,
                Err(e) => {
                    warn!(round, error = %e, "Could not snapshot known companies");
                    HashSet::new()
                }
            };

            let batch = match self.store.fetch_pending(self.config.batch_size).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(round, error = %e, "Could not fetch pending queries; stopping");
                    break;
                }
            };

            if batch.is_empty() {
                info!(round, "Frontier exhausted; research complete");
                break;
            }

            summary.rounds = round;
            summary.cases_inserted += self.run_round(round, &batch, known).await;
        }

        info!(
            rounds = summary.rounds,
            cases_inserted = summary.cases_inserted,
            "Agent run finished"
        );
        Ok(summary)
    }

    /// One round: stages, loaders, completion marking, expansion.
    /// Returns the number of cases inserted.
    async fn run_round(&self, round: usize, batch: &[String], known: HashSet<String>) -> usize {
        info!(round, queries = batch.len(), "Starting research round");

        let searcher = &self.searcher;
        let ai = &self.ai;
        let store = &self.store;

        // Phase 1: search + extract, one stage per query under the gate.
        let stages = batch.iter().map(|query| {
            let gate = Arc::clone(&self.gate);
            async move {
                let _permit = gate.acquire().await.unwrap();
                stage::run_stage(query, searcher, ai).await
            }
        });
        let outcomes = join_all(stages).await;

        let failed_queries = outcomes.iter().filter(|o| o.is_failed()).count();
        let drafts: Vec<_> = outcomes
            .into_iter()
            .flat_map(stage::StageOutcome::into_drafts)
            .collect();

        info!(
            round,
            drafts = drafts.len(),
            failed_queries,
            "Stages complete; loading new cases"
        );

        // Phase 2: dedup + embed + persist, one loader per draft. All stage
        // results are in hand before the first loader runs.
        let known = Arc::new(known);
        let loaders = drafts.into_iter().map(|draft| {
            let gate = Arc::clone(&self.gate);
            let known = Arc::clone(&known);
            async move {
                let _permit = gate.acquire().await.unwrap();
                loader::load_case(draft, &known, ai, store).await
            }
        });
        let inserted: Vec<CaseRecord> = join_all(loaders).await.into_iter().flatten().collect();

        // A query that found nothing is still done; it is never retried.
        if let Err(e) = self.store.mark_completed(batch).await {
            warn!(round, error = %e, "Could not mark batch completed");
        }

        // Expansion feeds on what this round actually stored, not on every
        // draft the stages produced.
        expand::expand_frontier(&inserted, ai, store).await;

        info!(round, inserted = inserted.len(), "Round complete");
        inserted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::{draft, MockAI, MockSearcher};
    use crate::traits::searcher::SearchHit;
    use crate::types::FrontierStatus;

    fn config(topics: &[&str]) -> RunConfig {
        RunConfig {
            seed_topics: topics.iter().map(|s| s.to_string()).collect(),
            ..RunConfig::default()
        }
    }

    #[tokio::test]
    async fn seed_to_expansion_scenario() {
        // Seed X and Y; X finds Acme, Y finds nothing; the expander turns
        // Acme into new pending queries for the next round.
        let store = MemoryStore::new();
        let searcher =
            MockSearcher::new().with_hits("X", vec![SearchHit::new("https://a.com", "story")]);
        let ai = MockAI::new()
            .with_drafts("X", vec![draft("Acme", "ran out of cash")])
            .with_suggestion("why did Acme fail\nstartups like Acme\n");

        let agent = Agent::new(
            store,
            searcher,
            ai,
            RunConfig {
                max_iterations: 1,
                ..config(&["X", "Y"])
            },
        );
        let summary = agent.run().await.unwrap();

        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.cases_inserted, 1);

        let entries = agent.store.frontier_entries();
        assert!(entries.contains(&("X".to_string(), FrontierStatus::Completed)));
        assert!(entries.contains(&("Y".to_string(), FrontierStatus::Completed)));
        assert!(entries.contains(&("why did Acme fail".to_string(), FrontierStatus::Pending)));
        assert!(entries.contains(&("startups like Acme".to_string(), FrontierStatus::Pending)));

        // Next round would pick up only the new queries.
        let pending = agent.store.fetch_pending(10).await.unwrap();
        assert_eq!(pending, vec!["why did Acme fail", "startups like Acme"]);
    }

    #[tokio::test]
    async fn failure_of_one_query_does_not_starve_the_other() {
        let store = MemoryStore::new();
        let searcher = MockSearcher::new()
            .with_failure("A")
            .with_hits("B", vec![SearchHit::new("https://b.com", "story")]);
        let ai = MockAI::new().with_drafts("B", vec![draft("Globex", "bad unit economics")]);

        let agent = Agent::new(
            store,
            searcher,
            ai,
            RunConfig {
                max_iterations: 1,
                ..config(&["A", "B"])
            },
        );
        let summary = agent.run().await.unwrap();

        assert_eq!(summary.cases_inserted, 1);
        assert_eq!(agent.store.case_records()[0].company_name, "Globex");

        // Both queries end up completed, including the failed one.
        let entries = agent.store.frontier_entries();
        assert!(entries
            .iter()
            .all(|(_, status)| *status == FrontierStatus::Completed));
    }

    #[tokio::test]
    async fn concurrent_case_variants_store_exactly_one_row() {
        let store = MemoryStore::new();
        let searcher =
            MockSearcher::new().with_hits("Q", vec![SearchHit::new("https://q.com", "story")]);
        let ai = MockAI::new().with_drafts(
            "Q",
            vec![draft("Acme", "ran out of cash"), draft("ACME", "pivot failed")],
        );

        let agent = Agent::new(
            store,
            searcher,
            ai,
            RunConfig {
                max_iterations: 1,
                ..config(&["Q"])
            },
        );
        let summary = agent.run().await.unwrap();

        assert_eq!(summary.cases_inserted, 1);
        assert_eq!(agent.store.case_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn terminates_at_iteration_cap_despite_growth() {
        // Every round finds a fresh company and the generator always
        // proposes another query, so only the cap can stop the loop.
        let store = MemoryStore::new();
        let mut searcher = MockSearcher::new();
        let mut ai = MockAI::new().with_suggestion("seed-1\nseed-2\nseed-3\nseed-4\nseed-5\n");

        searcher = searcher.with_hits("start", vec![SearchHit::new("https://s.com", "story")]);
        ai = ai.with_drafts("start", vec![draft("Company-start", "failed")]);
        for i in 1..=5 {
            let query = format!("seed-{}", i);
            searcher = searcher.with_hits(&query, vec![SearchHit::new("https://s.com", "story")]);
            ai = ai.with_drafts(&query, vec![draft(&format!("Company-{}", i), "failed")]);
        }

        let agent = Agent::new(
            store,
            searcher,
            ai,
            RunConfig {
                max_iterations: 3,
                batch_size: 1,
                ..config(&["start"])
            },
        );
        let summary = agent.run().await.unwrap();

        assert_eq!(summary.rounds, 3);
        assert!(agent.store.fetch_pending(10).await.unwrap().len() > 0);
    }

    #[tokio::test]
    async fn stops_early_when_frontier_drains() {
        let store = MemoryStore::new();
        let searcher = MockSearcher::new();
        let ai = MockAI::new();

        let agent = Agent::new(
            store,
            searcher,
            ai,
            RunConfig {
                max_iterations: 10,
                ..config(&["only"])
            },
        );
        let summary = agent.run().await.unwrap();

        // Round 1 drains the lone query (no results); round 2 sees an empty
        // frontier and stops well before the cap.
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.cases_inserted, 0);
    }

    #[tokio::test]
    async fn reseeding_after_completion_does_not_revive_queries() {
        let store = MemoryStore::new();
        let agent = Agent::new(
            store,
            MockSearcher::new(),
            MockAI::new(),
            RunConfig {
                max_iterations: 2,
                reset_frontier: false,
                ..config(&["topic"])
            },
        );

        agent.run().await.unwrap();
        // Second run with the same seeds: "topic" is already completed and
        // seeding is idempotent, so there is nothing to do.
        let summary = agent.run().await.unwrap();
        assert_eq!(summary.rounds, 0);
    }
}
