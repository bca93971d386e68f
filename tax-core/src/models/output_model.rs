use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

/// Result of one federal tax calculation.
///
/// Amounts are exact; use [`OutputModel::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputModel {
    pub tax_year: i32,
    /// Negative when credits exceed the computed tax.
    pub federal_tax_owed: Decimal,
    /// Rate of the highest bracket reached, as a whole percent.
    pub marginal_tax_rate: i32,
    /// Percent of gross income owed.
    pub effective_tax_rate: Decimal,
    pub take_home_pay: Decimal,
}

impl OutputModel {
    /// Copy with every amount rounded half-up to cents.
    pub fn rounded(&self) -> Self {
        Self {
            tax_year: self.tax_year,
            federal_tax_owed: round_half_up(self.federal_tax_owed),
            marginal_tax_rate: self.marginal_tax_rate,
            effective_tax_rate: round_half_up(self.effective_tax_rate),
            take_home_pay: round_half_up(self.take_home_pay),
        }
    }
}
