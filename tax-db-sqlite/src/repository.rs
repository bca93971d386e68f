use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tax_core::db::ensure_rows_for_year;
use tax_core::{
    BracketDetails, FilingColumn, FilingColumns, INCOME_CEILING, IncomeRange, RepositoryError,
    StandardDeductionDetails, TaxTableRepository, TaxTableStore,
};
use tracing::{debug, info};

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

const SELECT_BRACKETS: &str = "SELECT tax_year, tax_rate,
        single_min_income, single_max_income,
        joint_min_income, joint_max_income,
        separate_min_income, separate_max_income,
        head_of_household_min_income, head_of_household_max_income
     FROM bracket_details
     ORDER BY tax_year, tax_rate";

const SELECT_DEDUCTIONS: &str = "SELECT tax_year, single, joint, separate, head_of_household
     FROM standard_deduction_details
     ORDER BY tax_year";

const INSERT_BRACKET: &str = "INSERT INTO bracket_details (
        tax_year, tax_rate,
        single_min_income, single_max_income,
        joint_min_income, joint_max_income,
        separate_min_income, separate_max_income,
        head_of_household_min_income, head_of_household_max_income
     ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const INSERT_DEDUCTION: &str = "INSERT INTO standard_deduction_details (
        tax_year, single, joint, separate, head_of_household
     ) VALUES (?, ?, ?, ?, ?)";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, creating the file if it does not exist.
    ///
    /// Accepts a sqlx URL (`sqlite://tax_tables.db`), a bare path, or
    /// `:memory:`. In-memory databases are held on a single connection so
    /// every query sees the same tables.
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");
        let url = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{database_url}")
        };

        let options: SqliteConnectOptions = url
            .parse::<SqliteConnectOptions>()
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;

        debug!(database = database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Executes every `.sql` file in `seeds_dir`, in file name order.
    ///
    /// The shipped seed files skip any year that already has a standard
    /// deduction row.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;

            info!(seed = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn income_range(row: &SqliteRow, column: FilingColumn) -> Result<IncomeRange, RepositoryError> {
    let prefix = column.as_str();
    let min = get_decimal(row, &format!("{prefix}_min_income"))?;
    let max = get_optional_decimal(row, &format!("{prefix}_max_income"))?
        .unwrap_or(INCOME_CEILING);
    Ok(IncomeRange::new(min, max))
}

fn row_to_bracket(row: &SqliteRow) -> Result<BracketDetails, RepositoryError> {
    Ok(BracketDetails {
        tax_year: row
            .try_get("tax_year")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        tax_rate: row
            .try_get("tax_rate")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        ranges: FilingColumns {
            single: income_range(row, FilingColumn::Single)?,
            joint: income_range(row, FilingColumn::Joint)?,
            separate: income_range(row, FilingColumn::Separate)?,
            head_of_household: income_range(row, FilingColumn::HeadOfHousehold)?,
        },
    })
}

fn row_to_deduction(row: &SqliteRow) -> Result<StandardDeductionDetails, RepositoryError> {
    Ok(StandardDeductionDetails {
        tax_year: row
            .try_get("tax_year")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        amounts: FilingColumns {
            single: get_decimal(row, "single")?,
            joint: get_decimal(row, "joint")?,
            separate: get_decimal(row, "separate")?,
            head_of_household: get_decimal(row, "head_of_household")?,
        },
    })
}

#[async_trait]
impl TaxTableRepository for SqliteRepository {
    async fn get_bracket_rows(&self) -> Result<Vec<BracketDetails>, RepositoryError> {
        let rows = sqlx::query(SELECT_BRACKETS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_bracket).collect()
    }

    async fn get_deduction_rows(&self) -> Result<Vec<StandardDeductionDetails>, RepositoryError> {
        let rows = sqlx::query(SELECT_DEDUCTIONS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_deduction).collect()
    }

    async fn list_tax_years(&self) -> Result<Vec<i32>, RepositoryError> {
        let rows =
            sqlx::query("SELECT tax_year FROM standard_deduction_details ORDER BY tax_year DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get("tax_year")
                    .map_err(|e| RepositoryError::Database(e.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl TaxTableStore for SqliteRepository {
    async fn replace_tax_year(
        &self,
        tax_year: i32,
        brackets: &[BracketDetails],
        deduction: &StandardDeductionDetails,
    ) -> Result<(), RepositoryError> {
        ensure_rows_for_year(tax_year, brackets, deduction)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM bracket_details WHERE tax_year = ?")
            .bind(tax_year)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM standard_deduction_details WHERE tax_year = ?")
            .bind(tax_year)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        for bracket in brackets {
            let mut query = sqlx::query(INSERT_BRACKET)
                .bind(bracket.tax_year)
                .bind(bracket.tax_rate);
            for column in FilingColumn::all() {
                let range = bracket.ranges.get(*column);
                query = query
                    .bind(decimal_to_text(range.min))
                    .bind(decimal_to_text(range.max));
            }
            query
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        sqlx::query(INSERT_DEDUCTION)
            .bind(deduction.tax_year)
            .bind(decimal_to_text(deduction.amounts.single))
            .bind(decimal_to_text(deduction.amounts.joint))
            .bind(decimal_to_text(deduction.amounts.separate))
            .bind(decimal_to_text(deduction.amounts.head_of_household))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        info!(tax_year, brackets = brackets.len(), "replaced tax year tables");
        Ok(())
    }
}
