//! File-based credential storage.
//!
//! The pair is stored as a JSON object in the platform data directory:
//! - Linux: ~/.local/share/powershare/session.json
//! - macOS: ~/Library/Application Support/powershare/session.json
//! - Windows: %LOCALAPPDATA%/powershare/session.json

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use powershare_application::ports::{CredentialStorage, StorageError};
use powershare_domain::CredentialPair;
use powershare_domain::credentials::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use tokio::fs;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Credential storage backed by a JSON file.
///
/// ```json
/// {
///   "powershare_access_token": "eyJhbGciOi...",
///   "powershare_refresh_token": "eyJhbGciOi..."
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStorage {
    path: PathBuf,
}

impl FileCredentialStorage {
    /// Creates storage at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates storage at the default per-user location.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NoDataDir` if the platform has no data directory.
    pub fn at_default_location() -> Result<Self, StorageError> {
        Self::default_path().map(Self::new).ok_or(StorageError::NoDataDir)
    }

    /// Returns the default session file path, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("powershare").join("session.json"))
    }

    /// Returns the file this storage reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStorage for FileCredentialStorage {
    async fn load(&self) -> Result<Option<CredentialPair>, StorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let mut entries: BTreeMap<String, String> =
            from_json_bytes(&content).map_err(|e| StorageError::Serialization(e.to_string()))?;

        let pair = entries
            .remove(ACCESS_TOKEN_KEY)
            .zip(entries.remove(REFRESH_TOKEN_KEY))
            .map(|(access, refresh)| CredentialPair::new(access, refresh))
            .filter(CredentialPair::is_complete);
        debug!(path = %self.path.display(), found = pair.is_some(), "session file read");
        Ok(pair)
    }

    async fn save(&self, pair: &CredentialPair) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entries = BTreeMap::from([
            (ACCESS_TOKEN_KEY, pair.access_token.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh_token.as_str()),
        ]);
        let content =
            to_json_stable_bytes(&entries).map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn remove(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
