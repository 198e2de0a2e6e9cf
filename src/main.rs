mod api;
mod cli;
mod config;
mod error;
mod models;
mod services;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::cli::{ExportFormat, SourceKind};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "plstats")]
#[command(about = "Premier League player, team and injury statistics")]
struct Cli {
    /// Where upstream data is read from
    #[arg(long, value_enum, global = true, default_value_t = SourceKind::Live)]
    source: SourceKind,
    /// Snapshot directory (overrides PLSTATS_SNAPSHOT_DIR)
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,
    /// Year player ages are computed against (overrides PLSTATS_REFERENCE_YEAR)
    #[arg(long, global = true)]
    reference_year: Option<i32>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Print the team table and injury summary
    Report,
    /// Query team statistics
    Team {
        #[arg(short, long)]
        name: String,
    },
    /// Write the derived tables to disk
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(short, long, default_value = "export")]
        out: PathBuf,
    },
    /// Fetch live data and save it for offline replay
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.snapshot_dir {
        config.snapshot_dir = dir;
    }
    if let Some(year) = cli.reference_year {
        config.reference_year = year;
    }

    match cli.command {
        Some(Commands::Snapshot) => {
            tracing::info!("Saving snapshot to {}", config.snapshot_dir.display());
            cli::save_snapshot(&config).await?;
        }
        Some(Commands::Report) => {
            let tables = cli::load_tables(cli.source, &config).await?;
            cli::print_report(&tables);
        }
        Some(Commands::Team { name }) => {
            tracing::info!("Querying team: {}", name);
            let tables = cli::load_tables(cli.source, &config).await?;
            cli::query_team(&tables, &name);
        }
        Some(Commands::Export { format, out }) => {
            let tables = cli::load_tables(cli.source, &config).await?;
            cli::export(&tables, format, &out)?;
        }
        Some(Commands::Serve { port }) => {
            let tables = cli::load_tables(cli.source, &config).await?;
            api::serve(tables, port).await?;
        }
        None => {
            // Default to serving
            let tables = cli::load_tables(cli.source, &config).await?;
            api::serve(tables, 3000).await?;
        }
    }

    Ok(())
}
