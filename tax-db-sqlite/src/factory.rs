use std::path::PathBuf;

use async_trait::async_trait;
use tax_core::db::{DbConfig, RepositoryError, RepositoryFactory, TaxTableRepository};
use tracing::info;

use crate::repository::SqliteRepository;

/// Seeds directory, checked in order:
///
/// 1. `TAX_DB_SQLITE_SEEDS_DIR`
/// 2. `./seeds`, if it exists
/// 3. this crate's `seeds` directory in the source tree
pub fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TAX_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// The `sqlite` backend.
///
/// ```rust,no_run
/// use tax_core::db::RepositoryRegistry;
/// use tax_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string` (a path or `:memory:`), migrates it
    /// and applies the seed files. A seed file only fills in a year with no
    /// standard deduction row, so years imported with the loader survive a
    /// restart.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        let seeds = seeds_dir();
        repo.run_seeds(&seeds)
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(
            database = %config.connection_string,
            seeds = %seeds.display(),
            "sqlite tax tables ready"
        );
        Ok(Box::new(repo))
    }
}
