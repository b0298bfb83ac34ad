//! Credential storage port
//!
//! Defines the interface for persisting the session credential pair
//! across process restarts.

use async_trait::async_trait;
use powershare_domain::CredentialPair;
use tokio::sync::RwLock;

/// Errors that can occur while persisting credentials.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No per-user data directory could be determined.
    #[error("no data directory available")]
    NoDataDir,
}

/// Persistent storage for the credential pair.
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Loads the stored pair.
    ///
    /// # Returns
    /// `None` if nothing is stored or only one of the two tokens is present.
    async fn load(&self) -> Result<Option<CredentialPair>, StorageError>;

    /// Replaces the stored pair.
    ///
    /// # Errors
    /// Returns an error if the pair cannot be written.
    async fn save(&self, pair: &CredentialPair) -> Result<(), StorageError>;

    /// Removes both tokens.
    ///
    /// # Errors
    /// Returns an error if the stored pair cannot be removed.
    async fn remove(&self) -> Result<(), StorageError>;
}

/// Credential storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStorage {
    pair: RwLock<Option<CredentialPair>>,
}

impl MemoryCredentialStorage {
    /// Creates storage pre-filled with `pair`.
    #[must_use]
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

#[async_trait]
impl CredentialStorage for MemoryCredentialStorage {
    async fn load(&self) -> Result<Option<CredentialPair>, StorageError> {
        Ok(self.pair.read().await.clone())
    }

    async fn save(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        *self.pair.write().await = Some(pair.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        *self.pair.write().await = None;
        Ok(())
    }
}
