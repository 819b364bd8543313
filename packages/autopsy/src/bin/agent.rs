use anyhow::{Context, Result};
use autopsy::{Agent, OpenAI, PostgresStore, RecordStore, RunConfig, TavilySearcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,autopsy=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let openai_api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;
    let tavily_api_key = std::env::var("TAVILY_API_KEY").context("TAVILY_API_KEY must be set")?;

    let config = RunConfig::from_env().context("Invalid AUTOPSY_* configuration")?;

    // Connectivity failures here are fatal; everything after this point
    // degrades per-query or per-case instead.
    let store = PostgresStore::new(&database_url)
        .await
        .context("Failed to connect to database")?;

    let initial_count = store.case_count().await.context("Failed to read catalog size")?;
    tracing::info!(
        cases_in_catalog = initial_count,
        max_iterations = config.max_iterations,
        batch_size = config.batch_size,
        concurrency = config.concurrency,
        "Starting research agent"
    );

    let searcher = TavilySearcher::new(tavily_api_key);
    let ai = OpenAI::new(openai_api_key);

    let agent = Agent::new(store, searcher, ai, config);
    let summary = agent.run().await?;

    tracing::info!(
        rounds = summary.rounds,
        new_cases = summary.cases_inserted,
        total_cases = initial_count + summary.cases_inserted as u64,
        "Research agent finished"
    );

    Ok(())
}
