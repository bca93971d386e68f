use anyhow::{Context, Result, bail};
use clap::Subcommand;
use rust_decimal::Decimal;
use tax_core::db::{MemoryRepositoryFactory, RepositoryRegistry};
use tax_core::{FilingStatus, InputModel, OutputModel, TaxCalculationService};
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::debug;

use crate::utils::{format_percent, format_usd, parse_decimal};

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Calculate federal income tax for one filer.
    Calculate {
        /// Gross income in USD, e.g. `60000` or `60,000.00`.
        #[arg(long, value_parser = parse_decimal)]
        income: Decimal,

        /// Filing status code, e.g. `SINGLE` or `head-of-household`.
        #[arg(long)]
        status: FilingStatus,

        /// Tax year. Defaults to the configured year, then the newest
        /// supported year.
        #[arg(long)]
        year: Option<i32>,

        /// Total itemized deductions in USD.
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        deductions: Decimal,

        /// Total tax credits in USD.
        #[arg(long, value_parser = parse_decimal, default_value = "0")]
        credits: Decimal,
    },

    /// List the supported tax years, newest first.
    Years,

    /// List the filing status codes.
    Statuses,
}

/// Runs `command` and returns the text to print.
pub async fn run(
    service: &TaxCalculationService<'_>,
    command: &Command,
    default_tax_year: Option<i32>,
) -> Result<String> {
    match command {
        Command::Calculate {
            income,
            status,
            year,
            deductions,
            credits,
        } => {
            let tax_year = match year.or(default_tax_year) {
                Some(year) => year,
                None => newest_tax_year(service).await?,
            };
            debug!(tax_year, "resolved tax year");

            let input = InputModel {
                gross_income: *income,
                selected_filing_status: *status,
                selected_tax_year: tax_year,
                total_deductions: *deductions,
                total_credits: *credits,
            };
            let output = service
                .calculate_taxes(&input)
                .await
                .with_context(|| format!("cannot calculate {tax_year} federal tax"))?;

            Ok(render_output(*status, &output))
        }
        Command::Years => {
            let years = service
                .supported_tax_years()
                .await
                .context("cannot list tax years")?;
            Ok(years.iter().map(|year| format!("{year}\n")).collect())
        }
        Command::Statuses => Ok(service
            .filing_statuses()
            .iter()
            .map(|info| format!("{:<27}{}\n", info.code, info.description))
            .collect()),
    }
}

async fn newest_tax_year(service: &TaxCalculationService<'_>) -> Result<i32> {
    let years = service
        .supported_tax_years()
        .await
        .context("cannot list tax years")?;
    match years.first() {
        Some(year) => Ok(*year),
        None => bail!("no tax years are available; load tax tables first"),
    }
}

fn render_output(status: FilingStatus, output: &OutputModel) -> String {
    format!(
        "Tax year:            {}\n\
         Filing status:       {status}\n\
         Federal tax owed:    {}\n\
         Marginal tax rate:   {}%\n\
         Effective tax rate:  {}\n\
         Take-home pay:       {}\n",
        output.tax_year,
        format_usd(output.federal_tax_owed),
        output.marginal_tax_rate,
        format_percent(output.effective_tax_rate),
        format_usd(output.take_home_pay),
    )
}
