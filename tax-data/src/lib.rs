//! CSV import for the yearly federal tax tables.

pub mod loader;

pub use loader::{
    BracketRecord, DeductionRecord, TaxTableLoader, TaxTableLoaderError, TaxYearRows,
};
