//! Resolves the tables that apply to a single tax year.

use thiserror::Error;
use tracing::debug;

use crate::models::{BracketDetails, StandardDeductionDetails, TaxYearDetails};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxYearError {
    /// The year has no standard deduction row or no bracket rows.
    #[error("tax year {tax_year} is not supported: no {missing} found")]
    UnsupportedTaxYear {
        tax_year: i32,
        missing: &'static str,
    },
}

/// Picks the rows for `tax_year` out of the full tables.
///
/// The single matching deduction row is taken as-is. Matching bracket rows
/// are sorted ascending by rate, which is also ascending by income because
/// the tables are built that way.
///
/// # Errors
///
/// [`TaxYearError::UnsupportedTaxYear`] when either table has nothing for
/// the year.
pub fn resolve_tax_year(
    tax_year: i32,
    bracket_rows: &[BracketDetails],
    deduction_rows: &[StandardDeductionDetails],
) -> Result<TaxYearDetails, TaxYearError> {
    let standard_deduction = deduction_rows
        .iter()
        .find(|row| row.tax_year == tax_year)
        .cloned()
        .ok_or(TaxYearError::UnsupportedTaxYear {
            tax_year,
            missing: "standard deduction details",
        })?;

    let mut brackets: Vec<BracketDetails> = bracket_rows
        .iter()
        .filter(|row| row.tax_year == tax_year)
        .cloned()
        .collect();

    if brackets.is_empty() {
        return Err(TaxYearError::UnsupportedTaxYear {
            tax_year,
            missing: "tax brackets",
        });
    }

    brackets.sort_by_key(|row| row.tax_rate);

    debug!(tax_year, brackets = brackets.len(), "resolved tax year tables");

    Ok(TaxYearDetails {
        tax_year,
        standard_deduction,
        brackets,
    })
}
