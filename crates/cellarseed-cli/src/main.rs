mod seed;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cellarseed_core::plan;

#[derive(Debug, Parser)]
#[command(name = "cellarseed")]
#[command(about = "Wine catalog seeding from the Rakuten Ichiba item search API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch candidates, sample a balanced set, and write it to the database
    Seed {
        /// Number of wines to keep after stratified sampling
        #[arg(long, default_value_t = plan::TARGET)]
        target: usize,

        /// Candidate pool size per keyword x price-bracket segment
        #[arg(long, default_value_t = plan::CANDIDATES_PER_SEGMENT)]
        candidates_per_segment: usize,

        /// Fetch and sample, but skip all database writes
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = cellarseed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Seed {
            target,
            candidates_per_segment,
            dry_run,
        } => {
            seed::run(
                &config,
                seed::SeedOptions {
                    target,
                    candidates_per_segment,
                    dry_run,
                },
            )
            .await
        }
        Commands::Migrate => {
            let pool = cellarseed_db::connect_pool(
                &config.database_url,
                cellarseed_db::PoolConfig::from(&config),
            )
            .await?;
            let applied = cellarseed_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            Ok(())
        }
    }
}
