//! # Trend Report
//!
//! Command-line front end for the trend analysis service. Each subcommand
//! runs one analysis against the configured database and prints the result
//! as pretty JSON on stdout. Logs go to stderr and the `log/` directory.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use action_trends::config::ConfigManager;
use action_trends::database::{DatabaseConnection, DatabaseMigrations};
use action_trends::logging::init_structured_logging;
use action_trends::services::TrendAnalysisService;
use action_trends::store::PgExecutionLogStore;
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "trend-report")]
#[command(about = "Trend and anomaly analysis over action execution logs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to load (development, test, production)
    #[arg(short, long)]
    environment: Option<String>,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trend metrics for a date range
    Metrics {
        /// Range start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,

        /// Range end (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,

        /// Restrict to one action type
        #[arg(long)]
        action_type: Option<String>,
    },

    /// Duration anomalies over a trailing window
    Anomalies {
        /// Window length in days (default from configuration)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Optimization recommendations over a trailing window
    Recommendations {
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Compare metrics between two date ranges
    Compare {
        #[arg(long)]
        start1: DateTime<Utc>,
        #[arg(long)]
        end1: DateTime<Utc>,
        #[arg(long)]
        start2: DateTime<Utc>,
        #[arg(long)]
        end2: DateTime<Utc>,
    },

    /// Metrics, anomalies and recommendations in one report
    Analyze {
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Apply outstanding database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    init_structured_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("trend-report failed: {e:#}");
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let manager = match &cli.environment {
        Some(env) => ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), env),
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    }
    .context("loading configuration")?;
    let config = manager.config();

    let db = DatabaseConnection::from_config(config)
        .await
        .context("connecting to database")?;

    if matches!(cli.command, Commands::Migrate) {
        DatabaseMigrations::run_all(db.pool()).await?;
        info!("Migrations applied");
        db.close().await;
        return Ok(());
    }

    if config.database.run_migrations {
        DatabaseMigrations::run_all(db.pool()).await?;
    }

    let service = TrendAnalysisService::new(
        Arc::new(PgExecutionLogStore::new(db.pool().clone())),
        config.analysis.clone(),
    );
    let default_days = config.analysis.default_time_window_days;

    match cli.command {
        Commands::Metrics {
            start,
            end,
            action_type,
        } => print_json(
            &service
                .calculate_trend_metrics(start, end, action_type.as_deref())
                .await?,
        )?,
        Commands::Anomalies { days } => {
            print_json(&service.detect_anomalies(days.unwrap_or(default_days)).await?)?
        }
        Commands::Recommendations { days } => print_json(
            &service
                .generate_optimization_recommendations(days.unwrap_or(default_days))
                .await?,
        )?,
        Commands::Compare {
            start1,
            end1,
            start2,
            end2,
        } => print_json(
            &service
                .compare_trend_periods(start1, end1, start2, end2)
                .await?,
        )?,
        Commands::Analyze { days } => print_json(
            &service
                .complete_trend_analysis(days.unwrap_or(default_days))
                .await?,
        )?,
        Commands::Migrate => {}
    }

    db.close().await;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
