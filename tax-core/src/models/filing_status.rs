use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when text does not name one of the [`FilingStatus`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized filing status '{0}'")]
pub struct UnrecognizedFilingStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    SurvivingSpouse,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    /// Every status, in the order they are offered to the user.
    pub fn all() -> &'static [FilingStatus] {
        &[
            Self::Single,
            Self::MarriedFilingJointly,
            Self::SurvivingSpouse,
            Self::MarriedFilingSeparately,
            Self::HeadOfHousehold,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::MarriedFilingJointly => "MARRIED_FILING_JOINTLY",
            Self::SurvivingSpouse => "SURVIVING_SPOUSE",
            Self::MarriedFilingSeparately => "MARRIED_FILING_SEPARATELY",
            Self::HeadOfHousehold => "HEAD_OF_HOUSEHOLD",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::SurvivingSpouse => "Surviving Spouse",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
        }
    }

    /// The table column this status reads from. Joint filers and surviving
    /// spouses share a column.
    pub fn column(&self) -> FilingColumn {
        match self {
            Self::Single => FilingColumn::Single,
            Self::MarriedFilingJointly | Self::SurvivingSpouse => FilingColumn::Joint,
            Self::MarriedFilingSeparately => FilingColumn::Separate,
            Self::HeadOfHousehold => FilingColumn::HeadOfHousehold,
        }
    }
}

impl FromStr for FilingStatus {
    type Err = UnrecognizedFilingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|status| status.code().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnrecognizedFilingStatus(s.to_string()))
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One of the four value slots carried by every bracket and deduction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingColumn {
    Single,
    Joint,
    Separate,
    HeadOfHousehold,
}

impl FilingColumn {
    pub fn all() -> &'static [FilingColumn] {
        &[Self::Single, Self::Joint, Self::Separate, Self::HeadOfHousehold]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Joint => "joint",
            Self::Separate => "separate",
            Self::HeadOfHousehold => "head_of_household",
        }
    }
}

/// One value per [`FilingColumn`], looked up by column or by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingColumns<T> {
    pub single: T,
    pub joint: T,
    pub separate: T,
    pub head_of_household: T,
}

impl<T> FilingColumns<T> {
    pub fn get(&self, column: FilingColumn) -> &T {
        match column {
            FilingColumn::Single => &self.single,
            FilingColumn::Joint => &self.joint,
            FilingColumn::Separate => &self.separate,
            FilingColumn::HeadOfHousehold => &self.head_of_household,
        }
    }

    pub fn for_status(&self, status: FilingStatus) -> &T {
        self.get(status.column())
    }

    /// Builds a set of columns by calling `f` once per column, in
    /// [`FilingColumn::all`] order.
    pub fn from_fn(mut f: impl FnMut(FilingColumn) -> T) -> Self {
        Self {
            single: f(FilingColumn::Single),
            joint: f(FilingColumn::Joint),
            separate: f(FilingColumn::Separate),
            head_of_household: f(FilingColumn::HeadOfHousehold),
        }
    }
}

/// Listing record for a filing status (code plus human-readable name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStatusInfo {
    pub code: String,
    pub description: String,
}

impl From<FilingStatus> for FilingStatusInfo {
    fn from(status: FilingStatus) -> Self {
        Self {
            code: status.code().to_string(),
            description: status.description().to_string(),
        }
    }
}
