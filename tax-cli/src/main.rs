use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use tax_cli::app::{self, Command};
use tax_cli::config::{AppConfig, ConfigOverrides};
use tax_cli::logging;
use tax_core::TaxCalculationService;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal progressive income tax calculator.
///
/// Loads the federal tax tables from the configured backend and applies
/// them to the given income, filing status and tax year.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version)]
struct Cli {
    /// Configuration file. Defaults to `tax-calc.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Table backend: `memory` or `sqlite`.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Backend connection string.
    /// For SQLite this is a file path (e.g. `tax_tables.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or `EnvFilter` directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(ConfigOverrides {
        backend: cli.backend,
        connection_string: cli.db,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });

    logging::init_logging(&config.log.level);
    if let Some(path) = &config.log.file {
        logging::enable_file_logging(path)?;
    }
    info!(backend = %config.database.backend, "starting tax-calc");

    debug!("connecting to {} backend", config.database.backend);
    let registry = app::build_registry();
    let repo = registry
        .create(&config.database)
        .await
        .with_context(|| format!("cannot open the {} backend", config.database.backend))?;

    let service = TaxCalculationService::new(&*repo);
    let output = app::run(&service, &cli.command, config.default_tax_year).await?;
    print!("{output}");

    Ok(())
}
