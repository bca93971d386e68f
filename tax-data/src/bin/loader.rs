use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_data::TaxTableLoader;
use tax_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

/// Load federal tax tables from CSV files into a SQLite database.
///
/// Brackets CSV columns:
///   tax_year,tax_rate,single_min,single_max,joint_min,joint_max,
///   separate_min,separate_max,hoh_min,hoh_max
/// (leave a max empty for the top bracket)
///
/// Standard deductions CSV columns:
///   tax_year,single,joint,separate,head_of_household
///
/// Every year found in the files is validated, then replaced as a whole.
#[derive(Parser, Debug)]
#[command(name = "tax-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the tax brackets CSV file
    #[arg(short, long)]
    brackets: PathBuf,

    /// Path to the standard deductions CSV file
    #[arg(short = 'D', long)]
    deductions: PathBuf,

    /// SQLite database path or URL; the file is created if missing
    #[arg(short, long, default_value = "tax_tables.db")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    let brackets_file = File::open(&args.brackets)
        .with_context(|| format!("Failed to open: {}", args.brackets.display()))?;
    let brackets = TaxTableLoader::parse_brackets(brackets_file)
        .with_context(|| format!("Failed to parse CSV: {}", args.brackets.display()))?;

    let deductions_file = File::open(&args.deductions)
        .with_context(|| format!("Failed to open: {}", args.deductions.display()))?;
    let deductions = TaxTableLoader::parse_deductions(deductions_file)
        .with_context(|| format!("Failed to parse CSV: {}", args.deductions.display()))?;

    println!(
        "Parsed {} bracket rows and {} deduction rows",
        brackets.len(),
        deductions.len()
    );

    let written = TaxTableLoader::load(&repo, &brackets, &deductions)
        .await
        .context("Failed to load tax tables into database")?;

    println!("Successfully wrote {written} rows to the database.");

    Ok(())
}
