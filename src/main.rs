use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use matchday::api::SofaClient;
use matchday::orchestrator::RoundOrchestrator;
use matchday::persistence::{FactStore, PgFactStore};
use matchday::{AppConfig, MatchdayError, Result};

#[derive(Parser)]
#[command(name = "matchday", about = "Football match statistics collector", version)]
struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect one round end to end and refresh the season caches
    Run {
        #[arg(long)]
        tournament: i64,
        #[arg(long)]
        season: i64,
        #[arg(long)]
        round: u32,
    },
    /// Collect match lists only for a range of rounds
    Backfill {
        #[arg(long)]
        tournament: i64,
        #[arg(long)]
        season: i64,
        #[arg(long, default_value_t = 1)]
        from: u32,
        #[arg(long, default_value_t = 30)]
        to: u32,
    },
    /// Recompute the season caches without collecting match data
    Caches {
        #[arg(long)]
        tournament: i64,
        #[arg(long)]
        season: i64,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn report_table_counts(store: &dyn FactStore, label: &str) -> Result<()> {
    for (table, count) in store.table_counts().await? {
        info!(%table, count, "{label} row count");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config)?;
    if let Err(errors) = config.validate() {
        return Err(MatchdayError::Validation(errors.join("; ")));
    }
    init_logging(&config.logging.level);

    let api = Arc::new(SofaClient::new(&config.api)?);
    let store = Arc::new(PgFactStore::connect(&config.database).await?);
    let orchestrator = RoundOrchestrator::new(api, store.clone(), &config.pacing);

    report_table_counts(store.as_ref(), "before").await?;

    match cli.command {
        Commands::Run {
            tournament,
            season,
            round,
        } => {
            let summary = orchestrator.process_round(tournament, season, round).await?;
            info!(
                round,
                fetched = summary.matches_fetched,
                processed = summary.matches_processed,
                failed = summary.matches_failed,
                "run complete"
            );
        }
        Commands::Backfill {
            tournament,
            season,
            from,
            to,
        } => {
            let inserted = orchestrator
                .backfill_rounds(tournament, season, from, to)
                .await?;
            info!(from, to, inserted, "backfill complete");
        }
        Commands::Caches { tournament, season } => {
            orchestrator.refresh_caches(tournament, season).await?;
        }
    }

    report_table_counts(store.as_ref(), "after").await?;

    Ok(())
}
