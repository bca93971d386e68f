use serde::{Deserialize, Serialize};

use super::{BracketDetails, StandardDeductionDetails};

/// Everything needed to compute tax for one year. Built per calculation,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearDetails {
    pub tax_year: i32,
    pub standard_deduction: StandardDeductionDetails,
    /// Sorted ascending by `tax_rate`.
    pub brackets: Vec<BracketDetails>,
}
