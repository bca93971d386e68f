//! Progressive federal income tax calculation.
//!
//! Given the resolved tables for one year, the calculator walks the bracket
//! ladder for the filer's column:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income: gross income less the better of itemized or standard deduction |
//! | 2    | Marginal bracket: first bracket whose maximum covers taxable income |
//! | 3    | Applicable income: the slice of taxable income inside each bracket up to the marginal one |
//! | 4    | Tax: sum of applicable income × rate, less credits |
//! | 5    | Summary: marginal rate, effective rate, take-home pay |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{FederalTaxCalculator, resolve_tax_year};
//! use tax_core::{FilingStatus, InputModel, tables};
//!
//! let details = resolve_tax_year(2024, &tables::bracket_rows(), &tables::deduction_rows()).unwrap();
//! let input = InputModel {
//!     gross_income: dec!(60000),
//!     selected_filing_status: FilingStatus::Single,
//!     selected_tax_year: 2024,
//!     total_deductions: dec!(0),
//!     total_credits: dec!(0),
//! };
//!
//! let output = FederalTaxCalculator::new(&details).calculate(&input).unwrap();
//!
//! assert_eq!(output.federal_tax_owed, dec!(5216.00));
//! assert_eq!(output.marginal_tax_rate, 12);
//! assert_eq!(output.take_home_pay, dec!(54784.00));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, percent};
use crate::models::{
    BracketDetails, FilingStatus, InputModel, OutputModel, StandardDeductionDetails,
    TaxYearDetails,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FederalTaxError {
    /// The resolved year carries no bracket rows.
    #[error("no tax brackets provided for tax year {0}")]
    NoTaxBrackets(i32),

    /// A bracket index past the end of the table was requested.
    #[error("bracket index {index} is out of range for {len} brackets")]
    BracketIndexOutOfRange { index: usize, len: usize },

    /// Taxable income does not reach a bracket the scan selected. Only
    /// happens when a bracket's minimum is above the previous maximum.
    #[error(
        "taxable income {taxable_income} does not reach bracket {bracket_index} \
         (minimum {bracket_min}); bracket table is inconsistent"
    )]
    InconsistentBracketState {
        bracket_index: usize,
        taxable_income: Decimal,
        bracket_min: Decimal,
    },
}

/// Calculator for one tax year's progressive brackets.
#[derive(Debug, Clone)]
pub struct FederalTaxCalculator<'a> {
    details: &'a TaxYearDetails,
}

impl<'a> FederalTaxCalculator<'a> {
    /// `details.brackets` must be sorted ascending by rate, as
    /// [`resolve_tax_year`](super::resolve_tax_year) returns them.
    pub fn new(details: &'a TaxYearDetails) -> Self {
        Self { details }
    }

    fn brackets(&self) -> &'a [BracketDetails] {
        &self.details.brackets
    }

    /// Runs every step and packages the result.
    ///
    /// # Errors
    ///
    /// Returns [`FederalTaxError`] if the year has no brackets or the bracket
    /// table is inconsistent for the filer's column.
    pub fn calculate(
        &self,
        input: &InputModel,
    ) -> Result<OutputModel, FederalTaxError> {
        if self.brackets().is_empty() {
            return Err(FederalTaxError::NoTaxBrackets(self.details.tax_year));
        }

        let status = input.selected_filing_status;

        let taxable_income = taxable_income(
            input.gross_income,
            input.total_deductions,
            status,
            &self.details.standard_deduction,
        );

        let max_bracket_index = self.max_bracket_index(status, taxable_income);

        let federal_tax_owed = self.federal_tax_owed(
            status,
            max_bracket_index,
            taxable_income,
            input.total_credits,
        )?;

        debug!(
            tax_year = self.details.tax_year,
            %taxable_income,
            max_bracket_index,
            %federal_tax_owed,
            "federal tax computed"
        );

        Ok(self.assemble(input, federal_tax_owed, max_bracket_index))
    }

    /// Index of the bracket that holds the last dollar of taxable income.
    ///
    /// This is the first bracket whose maximum for the filer's column is at
    /// least `taxable_income`. Falls back to the last bracket when none is.
    pub fn max_bracket_index(
        &self,
        status: FilingStatus,
        taxable_income: Decimal,
    ) -> usize {
        self.brackets()
            .iter()
            .position(|bracket| taxable_income <= bracket.income_range_for(status).max)
            .unwrap_or_else(|| self.brackets().len().saturating_sub(1))
    }

    /// The part of `taxable_income` that falls inside bracket `index`.
    ///
    /// A bracket wholly below taxable income contributes its full width. The
    /// bracket that holds taxable income contributes the distance from its
    /// minimum.
    ///
    /// # Errors
    ///
    /// [`FederalTaxError::InconsistentBracketState`] if taxable income is
    /// below the bracket's minimum. Callers only ask for brackets up to
    /// [`max_bracket_index`](Self::max_bracket_index).
    pub fn applicable_income_for_bracket(
        &self,
        status: FilingStatus,
        index: usize,
        taxable_income: Decimal,
    ) -> Result<Decimal, FederalTaxError> {
        let bracket = self.bracket(index)?;
        let range = bracket.income_range_for(status);

        if taxable_income >= range.max {
            return Ok(range.max - range.min);
        }

        if taxable_income >= range.min {
            return Ok(taxable_income - range.min);
        }

        Err(FederalTaxError::InconsistentBracketState {
            bracket_index: index,
            taxable_income,
            bracket_min: range.min,
        })
    }

    /// Applicable income for every bracket from the first through
    /// `max_bracket_index`.
    pub fn applicable_incomes(
        &self,
        status: FilingStatus,
        max_bracket_index: usize,
        taxable_income: Decimal,
    ) -> Result<Vec<Decimal>, FederalTaxError> {
        (0..=max_bracket_index)
            .map(|index| self.applicable_income_for_bracket(status, index, taxable_income))
            .collect()
    }

    /// Sum of rate-weighted applicable income across brackets, less credits.
    ///
    /// Credits are refundable: the result goes negative when they exceed the
    /// computed tax.
    pub fn federal_tax_owed(
        &self,
        status: FilingStatus,
        max_bracket_index: usize,
        taxable_income: Decimal,
        total_credits: Decimal,
    ) -> Result<Decimal, FederalTaxError> {
        let mut tax = Decimal::ZERO;

        for index in 0..=max_bracket_index {
            let applicable_income =
                self.applicable_income_for_bracket(status, index, taxable_income)?;
            let rate = self.bracket(index)?.tax_rate;
            tax += applicable_income * percent(rate);
        }

        Ok(tax - total_credits)
    }

    fn bracket(
        &self,
        index: usize,
    ) -> Result<&'a BracketDetails, FederalTaxError> {
        self.brackets()
            .get(index)
            .ok_or(FederalTaxError::BracketIndexOutOfRange {
                index,
                len: self.brackets().len(),
            })
    }

    fn assemble(
        &self,
        input: &InputModel,
        federal_tax_owed: Decimal,
        max_bracket_index: usize,
    ) -> OutputModel {
        let marginal_tax_rate = self.brackets()[max_bracket_index].tax_rate;

        OutputModel {
            tax_year: input.selected_tax_year,
            federal_tax_owed,
            marginal_tax_rate,
            effective_tax_rate: effective_tax_rate(federal_tax_owed, input.gross_income),
            take_home_pay: input.gross_income - federal_tax_owed,
        }
    }
}

/// Taxable income after the more advantageous of itemized or standard
/// deduction.
///
/// Zero when gross income does not exceed the standard deduction. Otherwise
/// the smaller of `gross - itemized` and `gross - standard`, floored at zero.
pub fn taxable_income(
    gross_income: Decimal,
    total_deductions: Decimal,
    status: FilingStatus,
    standard_deduction: &StandardDeductionDetails,
) -> Decimal {
    let standard = standard_deduction.amount_for(status);

    if gross_income <= standard {
        return Decimal::ZERO;
    }

    let with_itemized = floor_at_zero(gross_income - total_deductions);
    let with_standard = gross_income - standard;

    with_itemized.min(with_standard)
}

/// Tax owed as a percent of gross income; zero when there is no income.
pub fn effective_tax_rate(
    federal_tax_owed: Decimal,
    gross_income: Decimal,
) -> Decimal {
    if gross_income.is_zero() {
        return Decimal::ZERO;
    }
    federal_tax_owed * Decimal::ONE_HUNDRED / gross_income
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::resolve_tax_year;
    use crate::models::{FilingColumns, INCOME_CEILING, IncomeRange};
    use crate::tables;

    fn details_for(year: i32) -> TaxYearDetails {
        resolve_tax_year(year, &tables::bracket_rows(), &tables::deduction_rows()).unwrap()
    }

    fn input(
        year: i32,
        status: FilingStatus,
        gross_income: Decimal,
        total_deductions: Decimal,
        total_credits: Decimal,
    ) -> InputModel {
        InputModel {
            gross_income,
            selected_filing_status: status,
            selected_tax_year: year,
            total_deductions,
            total_credits,
        }
    }

    /// Three brackets whose ranges meet exactly, same in every column.
    fn contiguous_details() -> TaxYearDetails {
        let row = |rate, min, max| BracketDetails {
            tax_year: 9999,
            tax_rate: rate,
            ranges: FilingColumns::from_fn(|_| IncomeRange::new(min, max)),
        };
        TaxYearDetails {
            tax_year: 9999,
            standard_deduction: StandardDeductionDetails {
                tax_year: 9999,
                amounts: FilingColumns::from_fn(|_| dec!(10000)),
            },
            brackets: vec![
                row(10, dec!(0), dec!(10000)),
                row(20, dec!(10000), dec!(50000)),
                row(30, dec!(50000), INCOME_CEILING),
            ],
        }
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_standard_deduction_is_better() {
        let details = details_for(2024);

        let result = taxable_income(
            dec!(50000),
            dec!(10000),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, dec!(35400));
    }

    #[test]
    fn taxable_income_itemizing_is_better() {
        let details = details_for(2024);

        let result = taxable_income(
            dec!(50000),
            dec!(20000),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, dec!(30000));
    }

    #[test]
    fn taxable_income_zero_below_standard_deduction() {
        let details = details_for(2024);

        let result = taxable_income(
            dec!(10000),
            dec!(5000),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn taxable_income_zero_when_deductions_exceed_income_below_standard() {
        let details = details_for(2024);

        let result = taxable_income(
            dec!(10000),
            dec!(15000),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn taxable_income_zero_at_exactly_the_standard_deduction() {
        let details = details_for(2024);

        let result = taxable_income(
            dec!(14600),
            dec!(0),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn taxable_income_itemized_path_floors_at_zero() {
        let details = details_for(2024);

        let result = taxable_income(
            dec!(20000),
            dec!(25000),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn taxable_income_joint_standard_deduction_2025() {
        let details = details_for(2025);

        let result = taxable_income(
            dec!(60000),
            dec!(20000),
            FilingStatus::MarriedFilingJointly,
            &details.standard_deduction,
        );

        assert_eq!(result, dec!(28500));
    }

    #[test]
    fn taxable_income_itemizing_is_better_2025() {
        let details = details_for(2025);

        let result = taxable_income(
            dec!(50000),
            dec!(40000),
            FilingStatus::Single,
            &details.standard_deduction,
        );

        assert_eq!(result, dec!(10000));
    }

    #[test]
    fn taxable_income_uses_status_column() {
        let details = details_for(2024);
        let deduction = &details.standard_deduction;

        let cases = [
            (FilingStatus::Single, dec!(85400)),
            (FilingStatus::MarriedFilingJointly, dec!(70800)),
            (FilingStatus::SurvivingSpouse, dec!(70800)),
            (FilingStatus::MarriedFilingSeparately, dec!(85400)),
            (FilingStatus::HeadOfHousehold, dec!(78100)),
        ];

        for (status, expected) in cases {
            assert_eq!(
                taxable_income(dec!(100000), dec!(0), status, deduction),
                expected,
                "{status:?}"
            );
        }
    }

    // =========================================================================
    // max_bracket_index tests
    // =========================================================================

    #[test]
    fn max_bracket_index_zero_income_is_first_bracket() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        assert_eq!(calculator.max_bracket_index(FilingStatus::Single, Decimal::ZERO), 0);
    }

    #[test]
    fn max_bracket_index_bracket_max_is_inclusive() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        assert_eq!(calculator.max_bracket_index(FilingStatus::Single, dec!(11600)), 0);
        assert_eq!(calculator.max_bracket_index(FilingStatus::Single, dec!(11600.01)), 1);
    }

    #[test]
    fn max_bracket_index_depends_on_column() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        // 20,000 is past the single 10% bracket but inside the joint one.
        assert_eq!(calculator.max_bracket_index(FilingStatus::Single, dec!(20000)), 1);
        assert_eq!(
            calculator.max_bracket_index(FilingStatus::SurvivingSpouse, dec!(20000)),
            0
        );
        assert_eq!(
            calculator.max_bracket_index(FilingStatus::HeadOfHousehold, dec!(20000)),
            1
        );
    }

    #[test]
    fn max_bracket_index_top_bracket() {
        let details = details_for(2025);
        let calculator = FederalTaxCalculator::new(&details);

        assert_eq!(
            calculator.max_bracket_index(FilingStatus::MarriedFilingSeparately, dec!(400000)),
            6
        );
    }

    #[test]
    fn max_bracket_index_falls_back_to_last_bracket_past_the_ceiling() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let index =
            calculator.max_bracket_index(FilingStatus::Single, INCOME_CEILING + dec!(1));

        assert_eq!(index, 6);
    }

    // =========================================================================
    // applicable_income_for_bracket tests
    // =========================================================================

    #[test]
    fn applicable_income_whole_bracket_when_income_exceeds_max() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        for status in FilingStatus::all() {
            let range = details.brackets[0].income_range_for(*status);

            let result = calculator
                .applicable_income_for_bracket(*status, 0, range.max + dec!(1))
                .unwrap();

            assert_eq!(result, range.max - range.min, "{status:?}");
        }
    }

    #[test]
    fn applicable_income_prorated_within_bracket() {
        let details = details_for(2025);
        let calculator = FederalTaxCalculator::new(&details);

        for status in FilingStatus::all() {
            let range = details.brackets[0].income_range_for(*status);
            let midpoint = (range.max + range.min) / dec!(2);

            let result = calculator
                .applicable_income_for_bracket(*status, 0, midpoint)
                .unwrap();

            assert_eq!(result, midpoint - range.min, "{status:?}");
        }
    }

    #[test]
    fn applicable_income_errors_below_bracket_min() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.applicable_income_for_bracket(FilingStatus::Single, 2, dec!(30000));

        assert_eq!(
            result,
            Err(FederalTaxError::InconsistentBracketState {
                bracket_index: 2,
                taxable_income: dec!(30000),
                bracket_min: dec!(47150),
            })
        );
    }

    #[test]
    fn applicable_income_errors_past_last_bracket() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.applicable_income_for_bracket(FilingStatus::Single, 7, dec!(1));

        assert_eq!(
            result,
            Err(FederalTaxError::BracketIndexOutOfRange { index: 7, len: 7 })
        );
    }

    #[test]
    fn applicable_incomes_cover_taxable_income_exactly() {
        let details = contiguous_details();
        let calculator = FederalTaxCalculator::new(&details);

        for taxable in [dec!(0), dec!(9999.99), dec!(10000), dec!(42123.45), dec!(750000)] {
            let index = calculator.max_bracket_index(FilingStatus::Single, taxable);
            let slices = calculator
                .applicable_incomes(FilingStatus::Single, index, taxable)
                .unwrap();

            assert_eq!(slices.iter().sum::<Decimal>(), taxable, "taxable {taxable}");
        }
    }

    #[test]
    fn applicable_incomes_cover_taxable_income_at_every_builtin_boundary() {
        for year in [2024, 2025] {
            let details = details_for(year);
            let calculator = FederalTaxCalculator::new(&details);

            for status in FilingStatus::all() {
                let mut incomes = vec![dec!(0), dec!(0.01)];
                for bracket in &details.brackets[..details.brackets.len() - 1] {
                    let max = bracket.income_range_for(*status).max;
                    incomes.extend([max - dec!(0.01), max, max + dec!(0.01), max + dec!(0.50)]);
                }

                for taxable in incomes {
                    let index = calculator.max_bracket_index(*status, taxable);
                    let slices = calculator
                        .applicable_incomes(*status, index, taxable)
                        .unwrap();

                    assert_eq!(
                        slices.iter().sum::<Decimal>(),
                        taxable,
                        "{year} {status:?} taxable {taxable}"
                    );
                }
            }
        }
    }

    #[test]
    fn applicable_incomes_split_at_bracket_boundary() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let slices = calculator
            .applicable_incomes(FilingStatus::Single, 2, dec!(60000))
            .unwrap();

        assert_eq!(slices, vec![dec!(11600), dec!(35550), dec!(12850)]);
    }

    // =========================================================================
    // federal_tax_owed tests
    // =========================================================================

    #[test]
    fn federal_tax_owed_first_bracket_only() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.federal_tax_owed(FilingStatus::Single, 0, dec!(10000), dec!(0));

        assert_eq!(result, Ok(dec!(1000)));
    }

    #[test]
    fn federal_tax_owed_two_brackets() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.federal_tax_owed(FilingStatus::Single, 1, dec!(45400), dec!(0));

        // 11600 * 0.10 + (45400 - 11600) * 0.12 = 1160 + 4056
        assert_eq!(result, Ok(dec!(5216.00)));
    }

    #[test]
    fn federal_tax_owed_subtracts_credits() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.federal_tax_owed(FilingStatus::Single, 1, dec!(45400), dec!(2000));

        assert_eq!(result, Ok(dec!(3216.00)));
    }

    #[test]
    fn federal_tax_owed_goes_negative_when_credits_exceed_tax() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.federal_tax_owed(FilingStatus::Single, 0, dec!(5000), dec!(800));

        assert_eq!(result, Ok(dec!(-300)));
    }

    #[test]
    fn federal_tax_owed_contiguous_table() {
        let details = contiguous_details();
        let calculator = FederalTaxCalculator::new(&details);

        let result = calculator.federal_tax_owed(FilingStatus::HeadOfHousehold, 2, dec!(60000), dec!(0));

        // 10000 * 0.10 + 40000 * 0.20 + 10000 * 0.30
        assert_eq!(result, Ok(dec!(12000)));
    }

    // =========================================================================
    // effective_tax_rate tests
    // =========================================================================

    #[test]
    fn effective_tax_rate_is_percent_of_gross() {
        assert_eq!(effective_tax_rate(dec!(5000), dec!(50000)), dec!(10));
    }

    #[test]
    fn effective_tax_rate_zero_income_is_zero() {
        assert_eq!(effective_tax_rate(dec!(-250), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_single_2024_golden_values() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let output = calculator
            .calculate(&input(2024, FilingStatus::Single, dec!(60000), dec!(0), dec!(0)))
            .unwrap();

        // Taxable income: 60000 - 14600 = 45400, which ends in the 12% bracket
        assert_eq!(output.tax_year, 2024);
        assert_eq!(output.federal_tax_owed, dec!(5216.00));
        assert_eq!(output.marginal_tax_rate, 12);
        assert_eq!(output.effective_tax_rate.round_dp(4), dec!(8.6933));
        assert_eq!(output.take_home_pay, dec!(54784.00));
    }

    #[test]
    fn calculate_reaches_22_percent_bracket() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let output = calculator
            .calculate(&input(2024, FilingStatus::Single, dec!(100000), dec!(0), dec!(0)))
            .unwrap();

        // Taxable 85400: 1160 + 35550 * 0.12 + (85400 - 47150) * 0.22
        assert_eq!(output.federal_tax_owed, dec!(13841.00));
        assert_eq!(output.marginal_tax_rate, 22);
        assert_eq!(output.effective_tax_rate, dec!(13.841));
        assert_eq!(output.take_home_pay, dec!(86159.00));
    }

    #[test]
    fn calculate_cents_just_past_first_bracket() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let output = calculator
            .calculate(&input(2024, FilingStatus::Single, dec!(26200.50), dec!(0), dec!(0)))
            .unwrap();

        // Taxable 11600.50: 1160 + 0.50 * 0.12
        assert_eq!(output.federal_tax_owed, dec!(1160.06));
        assert_eq!(output.marginal_tax_rate, 12);
    }

    #[test]
    fn calculate_every_status_with_cents_near_boundaries() {
        for year in [2024, 2025] {
            let details = details_for(year);
            let calculator = FederalTaxCalculator::new(&details);

            for status in FilingStatus::all() {
                let standard = details.standard_deduction.amount_for(*status);
                for bracket in &details.brackets[..details.brackets.len() - 1] {
                    let max = bracket.income_range_for(*status).max;
                    for offset in [dec!(-0.01), dec!(0.37)] {
                        let gross = standard + max + offset;
                        let result =
                            calculator.calculate(&input(year, *status, gross, dec!(0), dec!(0)));

                        assert!(result.is_ok(), "{year} {status:?} gross {gross}: {result:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn calculate_joint_and_surviving_spouse_match() {
        let details = details_for(2025);
        let calculator = FederalTaxCalculator::new(&details);

        let joint = calculator
            .calculate(&input(
                2025,
                FilingStatus::MarriedFilingJointly,
                dec!(250000),
                dec!(40000),
                dec!(1000),
            ))
            .unwrap();
        let surviving = calculator
            .calculate(&input(
                2025,
                FilingStatus::SurvivingSpouse,
                dec!(250000),
                dec!(40000),
                dec!(1000),
            ))
            .unwrap();

        assert_eq!(joint, surviving);
    }

    #[test]
    fn calculate_low_income_owes_nothing() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let output = calculator
            .calculate(&input(2024, FilingStatus::Single, dec!(10000), dec!(5000), dec!(0)))
            .unwrap();

        assert_eq!(output.federal_tax_owed, Decimal::ZERO);
        assert_eq!(output.marginal_tax_rate, 10);
        assert_eq!(output.effective_tax_rate, Decimal::ZERO);
        assert_eq!(output.take_home_pay, dec!(10000));
    }

    #[test]
    fn calculate_zero_income_reports_zero_effective_rate() {
        let details = details_for(2024);
        let calculator = FederalTaxCalculator::new(&details);

        let output = calculator
            .calculate(&input(2024, FilingStatus::Single, dec!(0), dec!(0), dec!(500)))
            .unwrap();

        assert_eq!(output.federal_tax_owed, dec!(-500));
        assert_eq!(output.effective_tax_rate, Decimal::ZERO);
        assert_eq!(output.take_home_pay, dec!(500));
    }

    #[test]
    fn calculate_is_idempotent() {
        let details = details_for(2025);
        let calculator = FederalTaxCalculator::new(&details);
        let request = input(2025, FilingStatus::HeadOfHousehold, dec!(123456.78), dec!(30000), dec!(250));

        assert_eq!(calculator.calculate(&request), calculator.calculate(&request));
    }

    #[test]
    fn calculate_tax_never_decreases_as_income_rises() {
        for year in [2024, 2025] {
            let details = details_for(year);
            let calculator = FederalTaxCalculator::new(&details);

            for status in FilingStatus::all() {
                let mut previous = Decimal::MIN;
                for step in 0..=320 {
                    let gross = Decimal::from(step) * dec!(2500.37);
                    let owed = calculator
                        .calculate(&input(year, *status, gross, dec!(0), dec!(0)))
                        .unwrap()
                        .federal_tax_owed;

                    assert!(owed >= previous, "{year} {status:?} at {gross}");
                    previous = owed;
                }
            }
        }
    }

    #[test]
    fn calculate_errors_without_brackets() {
        let mut details = details_for(2024);
        details.brackets.clear();
        let calculator = FederalTaxCalculator::new(&details);

        let result =
            calculator.calculate(&input(2024, FilingStatus::Single, dec!(50000), dec!(0), dec!(0)));

        assert_eq!(result, Err(FederalTaxError::NoTaxBrackets(2024)));
    }
}
