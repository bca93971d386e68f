use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingColumns, FilingStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeductionDetails {
    pub tax_year: i32,
    pub amounts: FilingColumns<Decimal>,
}

impl StandardDeductionDetails {
    pub fn amount_for(&self, status: FilingStatus) -> Decimal {
        *self.amounts.for_status(status)
    }
}
