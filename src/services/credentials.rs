//! Ticket credentials.
//!
//! A credential is the booking identifier handed to the customer after
//! payment; presenting it again later proves the booking. The ledger only
//! depends on the two traits below, so the medium (a token file here, a QR
//! image elsewhere) is pluggable.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{BookingId, Credential, CredentialRef};

#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Rejected(String),
}

/// Turns a paid booking into something the customer can present.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn issue(&self, booking_id: &BookingId) -> Result<CredentialRef, IssuanceError>;
}

/// Reads a presented credential back. `Ok(None)` means nothing was found.
#[async_trait]
pub trait CredentialReader: Send + Sync {
    async fn read_credential(&self) -> Result<Option<Credential>, IssuanceError>;
}

/// Writes the booking id to `ticket_<booking_id>.txt` under `dir`.
#[derive(Debug, Clone)]
pub struct FileCredentialIssuer {
    dir: PathBuf,
}

impl FileCredentialIssuer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, booking_id: &BookingId) -> PathBuf {
        self.dir.join(format!("ticket_{}.txt", booking_id))
    }
}

#[async_trait]
impl CredentialIssuer for FileCredentialIssuer {
    async fn issue(&self, booking_id: &BookingId) -> Result<CredentialRef, IssuanceError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(booking_id);
        tokio::fs::write(&path, booking_id.as_str()).await?;
        info!("Issued credential for booking {} at {}", booking_id, path.display());
        Ok(CredentialRef(path.display().to_string()))
    }
}

/// Reads a credential payload from a file written by [`FileCredentialIssuer`].
#[derive(Debug, Clone)]
pub struct FileCredentialReader {
    path: PathBuf,
}

impl FileCredentialReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CredentialReader for FileCredentialReader {
    async fn read_credential(&self) -> Result<Option<Credential>, IssuanceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let payload = contents.trim();
                if payload.is_empty() {
                    debug!("Credential file {} is empty", self.path.display());
                    Ok(None)
                } else {
                    Ok(Some(Credential::new(payload)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credential at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
