mod bracket_details;
mod filing_status;
mod input_model;
mod output_model;
mod standard_deduction;
mod tax_year_details;

pub use bracket_details::{BracketDetails, INCOME_CEILING, IncomeRange};
pub use filing_status::{
    FilingColumn, FilingColumns, FilingStatus, FilingStatusInfo, UnrecognizedFilingStatus,
};
pub use input_model::{InputModel, InputValidationError, MAX_USD_AMOUNT, MAX_USD_PRECISION};
pub use output_model::OutputModel;
pub use standard_deduction::StandardDeductionDetails;
pub use tax_year_details::TaxYearDetails;
