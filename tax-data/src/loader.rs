use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    BracketDetails, FilingColumn, FilingColumns, INCOME_CEILING, IncomeRange, RepositoryError,
    StandardDeductionDetails, TaxTableStore,
};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading tax tables.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("tax year {tax_year}: rate {tax_rate}% is outside 0..=100")]
    InvalidRate { tax_year: i32, tax_rate: i32 },

    #[error("tax year {tax_year}: rate {tax_rate}% appears more than once")]
    DuplicateRate { tax_year: i32, tax_rate: i32 },

    #[error("tax year {tax_year}, {column} column: {reason}")]
    InvalidBracketTable {
        tax_year: i32,
        column: &'static str,
        reason: String,
    },

    #[error("tax year {tax_year}: standard deduction for {column} is negative ({amount})")]
    NegativeDeduction {
        tax_year: i32,
        column: &'static str,
        amount: Decimal,
    },

    #[error("tax year {0} has brackets but no standard deduction row")]
    MissingDeduction(i32),

    #[error("tax year {0} has more than one standard deduction row")]
    DuplicateDeduction(i32),

    #[error("tax year {0} has a standard deduction row but no brackets")]
    MissingBrackets(i32),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// One row of the brackets CSV.
///
/// ```text
/// tax_year,tax_rate,single_min,single_max,joint_min,joint_max,separate_min,separate_max,hoh_min,hoh_max
/// 2024,10,0,11600,0,23200,0,11600,0,16550
/// 2024,37,609351,,731201,,365601,,609351,
/// ```
///
/// An empty maximum means the bracket has no upper bound.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub tax_rate: i32,
    pub single_min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub single_max: Option<Decimal>,
    pub joint_min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub joint_max: Option<Decimal>,
    pub separate_min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub separate_max: Option<Decimal>,
    pub hoh_min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub hoh_max: Option<Decimal>,
}

impl BracketRecord {
    fn range(min: Decimal, max: Option<Decimal>) -> IncomeRange {
        IncomeRange::new(min, max.unwrap_or(INCOME_CEILING))
    }

    pub fn to_bracket(&self) -> BracketDetails {
        BracketDetails {
            tax_year: self.tax_year,
            tax_rate: self.tax_rate,
            ranges: FilingColumns {
                single: Self::range(self.single_min, self.single_max),
                joint: Self::range(self.joint_min, self.joint_max),
                separate: Self::range(self.separate_min, self.separate_max),
                head_of_household: Self::range(self.hoh_min, self.hoh_max),
            },
        }
    }
}

/// One row of the standard deductions CSV:
/// `tax_year,single,joint,separate,head_of_household`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeductionRecord {
    pub tax_year: i32,
    pub single: Decimal,
    pub joint: Decimal,
    pub separate: Decimal,
    pub head_of_household: Decimal,
}

impl DeductionRecord {
    pub fn to_deduction(&self) -> StandardDeductionDetails {
        StandardDeductionDetails {
            tax_year: self.tax_year,
            amounts: FilingColumns {
                single: self.single,
                joint: self.joint,
                separate: self.separate,
                head_of_household: self.head_of_household,
            },
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Every row for one tax year, brackets sorted by rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxYearRows {
    pub tax_year: i32,
    pub brackets: Vec<BracketDetails>,
    pub deduction: StandardDeductionDetails,
}

/// Loads yearly tax tables from CSV into any [`TaxTableStore`].
pub struct TaxTableLoader;

impl TaxTableLoader {
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn parse_deductions<R: Read>(
        reader: R,
    ) -> Result<Vec<DeductionRecord>, TaxTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: DeductionRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by year, pairing each year's brackets with its single
    /// deduction row, and validates every year. Years come back in
    /// ascending order.
    pub fn group_years(
        brackets: &[BracketRecord],
        deductions: &[DeductionRecord],
    ) -> Result<Vec<TaxYearRows>, TaxTableLoaderError> {
        let mut bracket_groups: BTreeMap<i32, Vec<BracketDetails>> = BTreeMap::new();
        for record in brackets {
            bracket_groups
                .entry(record.tax_year)
                .or_default()
                .push(record.to_bracket());
        }

        let mut deduction_rows: BTreeMap<i32, StandardDeductionDetails> = BTreeMap::new();
        for record in deductions {
            if deduction_rows.insert(record.tax_year, record.to_deduction()).is_some() {
                return Err(TaxTableLoaderError::DuplicateDeduction(record.tax_year));
            }
        }

        if let Some(year) = deduction_rows
            .keys()
            .find(|year| !bracket_groups.contains_key(*year))
        {
            return Err(TaxTableLoaderError::MissingBrackets(*year));
        }

        let mut years = Vec::with_capacity(bracket_groups.len());
        for (tax_year, mut brackets) in bracket_groups {
            let deduction = deduction_rows
                .remove(&tax_year)
                .ok_or(TaxTableLoaderError::MissingDeduction(tax_year))?;
            brackets.sort_by_key(|row| row.tax_rate);

            let year = TaxYearRows {
                tax_year,
                brackets,
                deduction,
            };
            Self::validate(&year)?;
            years.push(year);
        }

        Ok(years)
    }

    /// Checks one year's tables.
    ///
    /// Rates must be unique, within 0..=100, and sorted ascending (as
    /// [`group_years`](Self::group_years) leaves them). For each column the
    /// brackets must start at 0, end at the ceiling, and each minimum must
    /// equal the previous maximum.
    pub fn validate(year: &TaxYearRows) -> Result<(), TaxTableLoaderError> {
        let tax_year = year.tax_year;

        let mut previous_rate: Option<i32> = None;
        for bracket in &year.brackets {
            if !(0..=100).contains(&bracket.tax_rate) {
                return Err(TaxTableLoaderError::InvalidRate {
                    tax_year,
                    tax_rate: bracket.tax_rate,
                });
            }
            if previous_rate.is_some_and(|rate| rate >= bracket.tax_rate) {
                return Err(TaxTableLoaderError::DuplicateRate {
                    tax_year,
                    tax_rate: bracket.tax_rate,
                });
            }
            previous_rate = Some(bracket.tax_rate);
        }

        for column in FilingColumn::all() {
            let invalid = |reason: String| TaxTableLoaderError::InvalidBracketTable {
                tax_year,
                column: column.as_str(),
                reason,
            };
            let ranges: Vec<IncomeRange> =
                year.brackets.iter().map(|b| *b.ranges.get(*column)).collect();

            let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
                return Err(TaxTableLoaderError::MissingBrackets(tax_year));
            };
            if !first.min.is_zero() {
                return Err(invalid(format!("first bracket starts at {}, not 0", first.min)));
            }
            if last.max != INCOME_CEILING {
                return Err(invalid(format!(
                    "last bracket ends at {}, not {INCOME_CEILING}",
                    last.max
                )));
            }

            for range in &ranges {
                if range.min > range.max {
                    return Err(invalid(format!(
                        "bracket {}..{} has its minimum above its maximum",
                        range.min, range.max
                    )));
                }
            }

            for pair in ranges.windows(2) {
                let (lower, upper) = (pair[0], pair[1]);
                if upper.min != lower.max {
                    return Err(invalid(format!(
                        "bracket starting at {} does not follow the bracket ending at {}",
                        upper.min, lower.max
                    )));
                }
            }

            let amount = *year.deduction.amounts.get(*column);
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(TaxTableLoaderError::NegativeDeduction {
                    tax_year,
                    column: column.as_str(),
                    amount,
                });
            }
        }

        Ok(())
    }

    /// Validates the records and replaces each year they cover in `store`.
    ///
    /// Nothing is written unless every year validates. Each year is replaced
    /// as one unit, so loading the same files twice leaves the same rows.
    /// Returns the number of rows written, brackets and deductions together.
    pub async fn load<S: TaxTableStore + ?Sized>(
        store: &S,
        brackets: &[BracketRecord],
        deductions: &[DeductionRecord],
    ) -> Result<usize, TaxTableLoaderError> {
        let years = Self::group_years(brackets, deductions)?;
        let mut written = 0;

        for year in &years {
            store
                .replace_tax_year(year.tax_year, &year.brackets, &year.deduction)
                .await?;
            written += year.brackets.len() + 1;

            info!(
                tax_year = year.tax_year,
                brackets = year.brackets.len(),
                "loaded tax year"
            );
        }

        Ok(written)
    }
}
