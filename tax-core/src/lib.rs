//! Federal progressive income tax engine.
//!
//! The [`calculations`] module holds the pure bracket math, [`db`] the
//! providers that serve the yearly tables, and [`service`] glues the two
//! together.

pub mod calculations;
pub mod db;
pub mod models;
pub mod service;
pub mod tables;

pub use db::{RepositoryError, TaxTableRepository, TaxTableStore};
pub use models::*;
pub use service::{TaxCalculationError, TaxCalculationService};
