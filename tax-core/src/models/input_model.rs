use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatus;

/// Largest USD amount accepted for any input field.
pub const MAX_USD_AMOUNT: Decimal = Decimal::from_parts(2_147_483_647, 0, 0, false, 0);

/// Digits allowed after the decimal point in a USD amount.
pub const MAX_USD_PRECISION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must not exceed {max} (got {value})", max = MAX_USD_AMOUNT)]
    TooLarge { field: &'static str, value: Decimal },

    #[error("{field} allows at most {places} decimal places (got {value})", places = MAX_USD_PRECISION)]
    TooPrecise { field: &'static str, value: Decimal },
}

/// User-entered inputs for one federal tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputModel {
    pub gross_income: Decimal,
    pub selected_filing_status: FilingStatus,
    pub selected_tax_year: i32,
    pub total_deductions: Decimal,
    pub total_credits: Decimal,
}

impl InputModel {
    /// Checks every USD field against the accepted range and precision.
    ///
    /// The calculation engine assumes input has already passed this check;
    /// it is the caller's job to run it.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        validate_usd("gross_income", self.gross_income)?;
        validate_usd("total_deductions", self.total_deductions)?;
        validate_usd("total_credits", self.total_credits)?;
        Ok(())
    }
}

fn validate_usd(
    field: &'static str,
    value: Decimal,
) -> Result<(), InputValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputValidationError::Negative { field, value });
    }
    if value > MAX_USD_AMOUNT {
        return Err(InputValidationError::TooLarge { field, value });
    }
    if value.normalize().scale() > MAX_USD_PRECISION {
        return Err(InputValidationError::TooPrecise { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn valid_input() -> InputModel {
        InputModel {
            gross_income: dec!(100000.50),
            selected_filing_status: FilingStatus::Single,
            selected_tax_year: 2025,
            total_deductions: dec!(13000.0),
            total_credits: dec!(100.25),
        }
    }

    #[test]
    fn valid_values_pass() {
        assert_eq!(valid_input().validate(), Ok(()));
    }

    #[test]
    fn zero_and_maximum_are_accepted() {
        let mut input = valid_input();
        input.gross_income = Decimal::ZERO;
        input.total_deductions = MAX_USD_AMOUNT;

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn negative_gross_income_is_rejected() {
        let mut input = valid_input();
        input.gross_income = dec!(-0.01);

        assert_eq!(
            input.validate(),
            Err(InputValidationError::Negative {
                field: "gross_income",
                value: dec!(-0.01),
            })
        );
    }

    #[test]
    fn deductions_above_maximum_are_rejected() {
        let mut input = valid_input();
        input.total_deductions = dec!(2147483647.01);

        assert_eq!(
            input.validate(),
            Err(InputValidationError::TooLarge {
                field: "total_deductions",
                value: dec!(2147483647.01),
            })
        );
    }

    #[test]
    fn credits_with_three_decimal_places_are_rejected() {
        let mut input = valid_input();
        input.total_credits = dec!(100.255);

        assert_eq!(
            input.validate(),
            Err(InputValidationError::TooPrecise {
                field: "total_credits",
                value: dec!(100.255),
            })
        );
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        let mut input = valid_input();
        input.gross_income = dec!(500.1000);

        assert_eq!(input.validate(), Ok(()));
    }
}
