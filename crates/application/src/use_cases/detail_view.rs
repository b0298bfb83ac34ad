//! Producer detail view
//!
//! A view fetches one producer's registration when opened. Closing the view
//! discards a fetch that has not finished yet.

use std::sync::Arc;

use powershare_domain::{ProducerDetail, ProducerDocument};
use tokio::sync::watch;
use tracing::debug;

use crate::error::ApplicationResult;
use crate::ports::HttpClient;
use crate::registry::{DownloadedDocument, ProducerRegistry};

/// Handle to an open detail view.
pub struct DetailView<C: HttpClient> {
    registry: Arc<ProducerRegistry<C>>,
    user_id: String,
    closed: watch::Sender<bool>,
}

impl<C: HttpClient> DetailView<C> {
    /// Opens a view for `user_id`. Nothing is fetched until [`load`](Self::load).
    pub fn open(registry: Arc<ProducerRegistry<C>>, user_id: impl Into<String>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            registry,
            user_id: user_id.into(),
            closed,
        }
    }

    /// Returns the producer this view shows.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Fetches the producer's details.
    ///
    /// Resolves to `Ok(None)` if the view is closed before or while the
    /// fetch runs; the late result, success or failure, is dropped.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` or `SessionInvalid` while the view is open.
    pub async fn load(&self) -> ApplicationResult<Option<ProducerDetail>> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return Ok(None);
        }

        tokio::select! {
            result = self.registry.detail(&self.user_id) => {
                if self.is_closed() {
                    debug!(user_id = %self.user_id, "view closed, dropping producer detail");
                    return Ok(None);
                }
                result.map(Some)
            }
            () = async { let _ = closed.wait_for(|closed| *closed).await; } => {
                debug!(user_id = %self.user_id, "view closed during fetch");
                Ok(None)
            }
        }
    }

    /// Closes the view. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    /// Returns true once [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Downloads one of the producer's documents.
    ///
    /// # Errors
    ///
    /// `DownloadFailed` for any failure.
    pub async fn download(&self, document: &ProducerDocument) -> ApplicationResult<DownloadedDocument> {
        self.registry.download(&document.download_url).await
    }
}
