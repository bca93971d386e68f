//! Entry point that ties a table provider to the calculation engine.

use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::{FederalTaxCalculator, FederalTaxError, TaxYearError, resolve_tax_year};
use crate::db::{RepositoryError, TaxTableRepository};
use crate::models::{
    FilingStatus, FilingStatusInfo, InputModel, InputValidationError, OutputModel, TaxYearDetails,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxCalculationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputValidationError),

    #[error("failed to load tax tables: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    TaxYear(#[from] TaxYearError),

    #[error(transparent)]
    FederalTax(#[from] FederalTaxError),
}

/// Calculates federal tax against whatever tables `repository` serves.
///
/// Tables are fetched fresh on every call, so a provider updated between
/// calls is picked up without rebuilding the service.
pub struct TaxCalculationService<'a> {
    repository: &'a dyn TaxTableRepository,
}

impl<'a> TaxCalculationService<'a> {
    pub fn new(repository: &'a dyn TaxTableRepository) -> Self {
        Self { repository }
    }

    /// Validates `input`, resolves its tax year and runs the calculation.
    pub async fn calculate_taxes(
        &self,
        input: &InputModel,
    ) -> Result<OutputModel, TaxCalculationError> {
        if let Err(e) = input.validate() {
            warn!(error = %e, "rejected calculation input");
            return Err(e.into());
        }

        let details = self.tax_year_details(input.selected_tax_year).await?;
        let output = FederalTaxCalculator::new(&details).calculate(input)?;

        info!(
            tax_year = output.tax_year,
            filing_status = %input.selected_filing_status,
            federal_tax_owed = %output.federal_tax_owed,
            marginal_tax_rate = output.marginal_tax_rate,
            "calculated federal tax"
        );

        Ok(output)
    }

    /// Standard deduction and sorted brackets for `tax_year`.
    pub async fn tax_year_details(
        &self,
        tax_year: i32,
    ) -> Result<TaxYearDetails, TaxCalculationError> {
        let brackets = self.repository.get_bracket_rows().await?;
        let deductions = self.repository.get_deduction_rows().await?;

        Ok(resolve_tax_year(tax_year, &brackets, &deductions)?)
    }

    /// Years with a standard deduction row, newest first.
    pub async fn supported_tax_years(&self) -> Result<Vec<i32>, TaxCalculationError> {
        Ok(self.repository.list_tax_years().await?)
    }

    pub fn filing_statuses(&self) -> Vec<FilingStatusInfo> {
        FilingStatus::all()
            .iter()
            .copied()
            .map(FilingStatusInfo::from)
            .collect()
    }
}
