//! Tax tables held in process memory.

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::info;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{
    RepositoryError, TaxTableRepository, TaxTableStore, ensure_rows_for_year,
};
use crate::models::{BracketDetails, StandardDeductionDetails};
use crate::tables;

#[derive(Debug, Default)]
struct Rows {
    brackets: Vec<BracketDetails>,
    deductions: Vec<StandardDeductionDetails>,
}

/// A provider over owned row vectors.
///
/// Reads clone the current rows. [`TaxTableStore::replace_tax_year`] swaps a
/// year's rows under a write lock, so readers never see half a year.
#[derive(Debug, Default)]
pub struct InMemoryTaxTables {
    rows: RwLock<Rows>,
}

impl InMemoryTaxTables {
    pub fn new(
        brackets: Vec<BracketDetails>,
        deductions: Vec<StandardDeductionDetails>,
    ) -> Self {
        Self {
            rows: RwLock::new(Rows {
                brackets,
                deductions,
            }),
        }
    }

    /// The 2024 and 2025 federal tables.
    pub fn builtin() -> Self {
        Self::new(tables::bracket_rows(), tables::deduction_rows())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Rows>, RepositoryError> {
        self.rows
            .read()
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }
}

#[async_trait]
impl TaxTableRepository for InMemoryTaxTables {
    async fn get_bracket_rows(&self) -> Result<Vec<BracketDetails>, RepositoryError> {
        Ok(self.read()?.brackets.clone())
    }

    async fn get_deduction_rows(&self) -> Result<Vec<StandardDeductionDetails>, RepositoryError> {
        Ok(self.read()?.deductions.clone())
    }
}

#[async_trait]
impl TaxTableStore for InMemoryTaxTables {
    async fn replace_tax_year(
        &self,
        tax_year: i32,
        brackets: &[BracketDetails],
        deduction: &StandardDeductionDetails,
    ) -> Result<(), RepositoryError> {
        ensure_rows_for_year(tax_year, brackets, deduction)?;

        let mut rows = self
            .rows
            .write()
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.brackets.retain(|row| row.tax_year != tax_year);
        rows.brackets.extend_from_slice(brackets);
        rows.deductions.retain(|row| row.tax_year != tax_year);
        rows.deductions.push(deduction.clone());

        Ok(())
    }
}

/// Registers [`InMemoryTaxTables::builtin`] as the `memory` backend.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError> {
        info!("using built-in tax tables");
        Ok(Box::new(InMemoryTaxTables::builtin()))
    }
}
