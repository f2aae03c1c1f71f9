pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod services;

use std::sync::Arc;

pub use error::{Error, Result};

use services::{Accounts, CatalogSeed, CatalogStore, CredentialIssuer, FileCredentialIssuer, Ledger};

// Shared state for the whole application, built around one store handle
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub catalog: CatalogStore,
    pub ledger: Ledger,
    pub accounts: Accounts,
}

impl AppState {
    /// Connects, migrates and seeds the reference catalog, issuing
    /// credentials as files under the configured directory.
    pub async fn new(config: config::Config) -> Result<Arc<Self>> {
        let issuer = Arc::new(FileCredentialIssuer::new(config.credentials.output_dir.clone()));
        Self::with_issuer(config, &CatalogSeed::default(), issuer).await
    }

    pub async fn with_issuer(
        config: config::Config,
        seed: &CatalogSeed,
        issuer: Arc<dyn CredentialIssuer>,
    ) -> Result<Arc<Self>> {
        let db = database::Database::from_config(&config.database).await?;

        db.run_migrations().await?;

        let catalog = CatalogStore::new(db.clone(), config.booking.clone());
        catalog.seed_catalog(seed).await?;

        let ledger = Ledger::new(db.clone(), config.booking.clone(), issuer);
        let accounts = Accounts::new(db.clone());

        Ok(Arc::new(Self {
            db,
            config,
            catalog,
            ledger,
            accounts,
        }))
    }
}
