use cache::{Cache, MemoryCache, RedisCache};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::CacheSettings;
use database::connection::{connect, run_migrations};
use database::repository::DbRepository;
use engine::{CacheCoordinator, CompositionService, IndexBuilder, PerformanceAggregator};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// The main entry point for the index engine CLI.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = configuration::load_config().expect("Failed to load config.toml");

    // Initialize the database connection and run migrations
    let db_pool = connect().await.expect("Failed to connect to the database");
    run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let repo = DbRepository::new(db_pool);
    let cache = open_cache(&config.cache).await;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Build(args) => handle_build(args, &repo, cache, &config.index).await,
        Commands::Performance(args) => handle_performance(args, &repo, cache).await,
        Commands::Composition(args) => handle_composition(args, &repo, cache).await,
        Commands::Changes(args) => handle_changes(args, &repo, cache).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Maintains a synthetic equal-weighted stock index over ingested market data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild compositions and performance for a date range.
    Build(BuildArgs),
    /// Query the performance series and summary statistics for a range.
    Performance(RangeArgs),
    /// Query the index composition for a single date.
    Composition(CompositionArgs),
    /// Query day-over-day composition changes for a range.
    Changes(RangeArgs),
}

#[derive(Parser)]
struct BuildArgs {
    /// The start date of the rebuild (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// The end date of the rebuild; defaults to the latest ingested date.
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct RangeArgs {
    /// The start date of the query (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// The end date of the query (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,
}

#[derive(Parser)]
struct CompositionArgs {
    /// The date to query (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Opens the Redis cache, falling back to an in-process cache when the
/// backend is unreachable. Caching is advisory; an unreachable backend must
/// never stop the engine.
async fn open_cache(settings: &CacheSettings) -> Arc<dyn Cache> {
    let ttl = Duration::from_secs(settings.ttl_secs);
    match RedisCache::connect(&settings.redis_url, ttl).await {
        Ok(redis) => Arc::new(redis),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, using in-process cache");
            Arc::new(MemoryCache::new(ttl))
        }
    }
}

async fn handle_build(
    args: BuildArgs,
    repo: &DbRepository,
    cache: Arc<dyn Cache>,
    settings: &configuration::IndexSettings,
) -> anyhow::Result<()> {
    if let Some(to) = args.to {
        validate_range(args.from, to)?;
    }
    let builder = IndexBuilder::new(repo.clone(), CacheCoordinator::new(cache), settings);
    let outcome = builder.build(args.from, args.to).await?;
    print_json(&outcome)
}

async fn handle_performance(
    args: RangeArgs,
    repo: &DbRepository,
    cache: Arc<dyn Cache>,
) -> anyhow::Result<()> {
    validate_range(args.from, args.to)?;
    let aggregator = PerformanceAggregator::new(repo.clone(), cache);
    let response = aggregator.get_performance(args.from, args.to).await?;
    print_json(&response)
}

async fn handle_composition(
    args: CompositionArgs,
    repo: &DbRepository,
    cache: Arc<dyn Cache>,
) -> anyhow::Result<()> {
    let service = CompositionService::new(repo.clone(), cache);
    let response = service.get_composition(args.date).await?;
    print_json(&response)
}

async fn handle_changes(
    args: RangeArgs,
    repo: &DbRepository,
    cache: Arc<dyn Cache>,
) -> anyhow::Result<()> {
    validate_range(args.from, args.to)?;
    let service = CompositionService::new(repo.clone(), cache);
    let response = service.get_composition_changes(args.from, args.to).await?;
    print_json(&response)
}

/// Date-range validation happens here, before any request reaches the engine.
fn validate_range(from: NaiveDate, to: NaiveDate) -> anyhow::Result<()> {
    if to < from {
        anyhow::bail!("--to ({to}) must not be before --from ({from})");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
