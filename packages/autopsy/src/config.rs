//! Run configuration.

use std::env;

use crate::error::{AgentError, Result};

/// Topics a fresh frontier is seeded with.
pub const SEED_TOPICS: [&str; 10] = [
    "Y Combinator startup post-mortems",
    "TechCrunch deadpool analysis",
    "CB Insights startup failure reports",
    "failed SaaS companies 2022",
    "post-mortems of venture-backed startups",
    "failed fintech startups analysis",
    "why did D2C brands shut down",
    "biggest gaming startup failures",
    "failed HealthTech companies case studies",
    "top EdTech startup failures",
];

/// Tunables for a single run.
///
/// These are run-scoped constants rather than CLI surface; the environment
/// can override the defaults (`AUTOPSY_*` variables).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Hard cap on rounds. This is what bounds the self-feeding crawl.
    pub max_iterations: usize,

    /// Queries drained from the frontier per round.
    pub batch_size: usize,

    /// Permits on the admission gate bounding simultaneous external calls.
    pub concurrency: usize,

    /// Clear the frontier before seeding (fresh run).
    pub reset_frontier: bool,

    /// Topics seeded at startup.
    pub seed_topics: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            batch_size: 5,
            concurrency: 5,
            reset_frontier: true,
            seed_topics: SEED_TOPICS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RunConfig {
    /// Defaults with `AUTOPSY_*` environment overrides applied.
    ///
    /// Recognized: `AUTOPSY_MAX_ITERATIONS`, `AUTOPSY_BATCH_SIZE`,
    /// `AUTOPSY_CONCURRENCY` (positive integers) and
    /// `AUTOPSY_KEEP_FRONTIER` (presence skips the startup reset).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = read_positive("AUTOPSY_MAX_ITERATIONS")? {
            config.max_iterations = v;
        }
        if let Some(v) = read_positive("AUTOPSY_BATCH_SIZE")? {
            config.batch_size = v;
        }
        if let Some(v) = read_positive("AUTOPSY_CONCURRENCY")? {
            config.concurrency = v;
        }
        if env::var("AUTOPSY_KEEP_FRONTIER").is_ok() {
            config.reset_frontier = false;
        }

        Ok(config)
    }
}

fn read_positive(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(value) => value
            .parse::<usize>()
            .ok()
            .filter(|v| *v > 0)
            .map(Some)
            .ok_or_else(|| {
                AgentError::Config(format!("{} must be a positive integer", name).into())
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_run_constants() {
        let config = RunConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.concurrency, 5);
        assert!(config.reset_frontier);
        assert_eq!(config.seed_topics.len(), 10);
    }
}
