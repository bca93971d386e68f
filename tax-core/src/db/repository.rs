use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BracketDetails, StandardDeductionDetails};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Read access to the federal tax tables, every year at once.
#[async_trait]
pub trait TaxTableRepository: Send + Sync {
    async fn get_bracket_rows(&self) -> Result<Vec<BracketDetails>, RepositoryError>;

    async fn get_deduction_rows(&self) -> Result<Vec<StandardDeductionDetails>, RepositoryError>;

    /// Years that have a standard deduction row, newest first.
    async fn list_tax_years(&self) -> Result<Vec<i32>, RepositoryError> {
        let mut years: Vec<i32> = self
            .get_deduction_rows()
            .await?
            .iter()
            .map(|row| row.tax_year)
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }
}

/// Write access used when importing tables.
#[async_trait]
pub trait TaxTableStore: TaxTableRepository {
    /// Replaces every bracket row and the deduction row for `tax_year` in one
    /// unit. Rows whose `tax_year` differs are rejected.
    async fn replace_tax_year(
        &self,
        tax_year: i32,
        brackets: &[BracketDetails],
        deduction: &StandardDeductionDetails,
    ) -> Result<(), RepositoryError>;
}

/// Checks that every row handed to [`TaxTableStore::replace_tax_year`]
/// belongs to `tax_year`.
pub fn ensure_rows_for_year(
    tax_year: i32,
    brackets: &[BracketDetails],
    deduction: &StandardDeductionDetails,
) -> Result<(), RepositoryError> {
    let stray = brackets
        .iter()
        .map(|row| row.tax_year)
        .chain(std::iter::once(deduction.tax_year))
        .find(|year| *year != tax_year);

    match stray {
        Some(year) => Err(RepositoryError::Database(format!(
            "row for tax year {year} cannot replace tax year {tax_year}"
        ))),
        None => Ok(()),
    }
}
