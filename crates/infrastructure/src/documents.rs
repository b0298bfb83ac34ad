//! Saving downloaded producer documents to disk.

use std::path::{Path, PathBuf};

use powershare_application::DownloadedDocument;
use thiserror::Error;
use tokio::fs;
use tracing::info;

const FALLBACK_NAME: &str = "documento";

/// Errors that can occur while saving a document.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The file could not be written.
    #[error("could not write {path}: {source}")]
    Io {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Writes downloaded documents into one directory.
#[derive(Debug, Clone)]
pub struct DocumentSaver {
    dir: PathBuf,
}

impl DocumentSaver {
    /// Creates a saver writing into `dir`. The directory is created on the
    /// first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `document` under `name`, returning the written path.
    ///
    /// An extension matching the document's content type is appended when
    /// `name` lacks one. Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, name: &str, document: &DownloadedDocument) -> Result<PathBuf, SaveError> {
        let path = self
            .dir
            .join(file_name(name, document.content_type.as_deref()));
        let io_error = |source| SaveError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        fs::write(&path, &document.bytes).await.map_err(io_error)?;

        info!(path = %path.display(), bytes = document.bytes.len(), "document saved");
        Ok(path)
    }
}

/// Builds a safe file name from a document type and its content type.
///
/// Path separators and other unsafe characters become `_`, so the result
/// always names a file directly inside the target directory.
#[must_use]
pub fn file_name(name: &str, content_type: Option<&str>) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.').trim();
    let stem = if sanitized.is_empty() {
        FALLBACK_NAME
    } else {
        sanitized
    };

    let Some(mime) = content_type.and_then(|ct| ct.parse::<mime::Mime>().ok()) else {
        return stem.to_string();
    };
    if mime_guess::from_path(stem).iter().any(|guess| guess.essence_str() == mime.essence_str()) {
        return stem.to_string();
    }
    match extension_for(&mime) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

fn extension_for(mime: &mime::Mime) -> Option<&'static str> {
    let extensions = mime_guess::get_mime_extensions(mime)?;
    let subtype = mime.subtype().as_str();
    extensions
        .iter()
        .copied()
        .find(|ext| *ext == subtype)
        .or_else(|| extensions.first().copied())
}
