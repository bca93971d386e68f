//! Federal income tax calculation.
//!
//! [`resolve_tax_year`] narrows the full tables down to one year, and
//! [`FederalTaxCalculator`] runs the bracket math against the result.

pub mod common;
pub mod federal_tax;
pub mod tax_year;

pub use federal_tax::{FederalTaxCalculator, FederalTaxError, effective_tax_rate, taxable_income};
pub use tax_year::{TaxYearError, resolve_tax_year};
