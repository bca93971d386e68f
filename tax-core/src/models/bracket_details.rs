use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingColumns, FilingStatus};

/// The top of the highest bracket. Stored as a finite value rather than an
/// open upper bound.
pub const INCOME_CEILING: Decimal = Decimal::from_parts(2_147_483_647, 0, 0, false, 0);

/// Inclusive income bounds (USD) of one bracket for one filing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl IncomeRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }
}

/// One row of a year's bracket table: a marginal rate and the income range
/// it covers for each filing column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDetails {
    pub tax_year: i32,
    /// Marginal rate as a whole percent.
    pub tax_rate: i32,
    pub ranges: FilingColumns<IncomeRange>,
}

impl BracketDetails {
    pub fn income_range_for(&self, status: FilingStatus) -> IncomeRange {
        *self.ranges.for_status(status)
    }
}
