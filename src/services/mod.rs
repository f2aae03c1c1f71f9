pub mod accounts;
pub mod catalog;
pub mod credentials;
pub mod ledger;

pub use accounts::Accounts;
pub use catalog::{CatalogSeed, CatalogStore, SeedSummary};
pub use credentials::{CredentialIssuer, CredentialReader, FileCredentialIssuer, FileCredentialReader};
pub use ledger::Ledger;
