use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::repository::{RepositoryError, TaxTableRepository};

/// Where the tax tables come from.
///
/// `backend` names a registered [`RepositoryFactory`]. `connection_string`
/// goes to that factory untouched:
///
/// | backend    | connection_string examples          |
/// |------------|-------------------------------------|
/// | `memory`   | ignored                             |
/// | `sqlite`   | `tax_tables.db`, `:memory:`         |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Builds a [`TaxTableRepository`] for one backend. Backend crates export a
/// unit struct implementing this and register it at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase key the registry dispatches on.
    fn backend_name(&self) -> &'static str;

    /// Returns a provider whose tables are ready to read. May run
    /// migrations and seeds first.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError>;
}

/// Factories keyed by [`RepositoryFactory::backend_name`].
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds `factory`, replacing any factory with the same name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Hands `config` to the factory registered for `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] for an unregistered backend, or
    /// whatever the factory itself reports.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            )));
        };

        debug!(backend = %config.backend, "opening tax table repository");
        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
