pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use memory::{InMemoryTaxTables, MemoryRepositoryFactory};
pub use repository::{RepositoryError, TaxTableRepository, TaxTableStore, ensure_rows_for_year};
