//! Typed gateway to the producer registry and user service.

use std::sync::Arc;

use powershare_domain::{
    ApiEndpoints, DomainError, ProducerDetail, Proposal, ProposalRow, ProposalStatus,
    RejectionReason, RequestBody, RequestSpec, ResponseSpec, StatusCode, UserDetail,
};
use tracing::debug;

use crate::auth::AuthenticatedClient;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;

/// Raw bytes of a downloaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDocument {
    /// `Content-Type` the server answered with, if any.
    pub content_type: Option<String>,
    /// Document content.
    pub bytes: Vec<u8>,
}

/// Registry operations, all sent through an [`AuthenticatedClient`].
///
/// Transport failures and unexpected statuses surface as
/// `RemoteCallFailed`; session failures pass through as `SessionInvalid`.
pub struct ProducerRegistry<C: HttpClient> {
    client: Arc<AuthenticatedClient<C>>,
}

impl<C: HttpClient> ProducerRegistry<C> {
    /// Creates the gateway.
    pub const fn new(client: Arc<AuthenticatedClient<C>>) -> Self {
        Self { client }
    }

    fn endpoints(&self) -> &ApiEndpoints {
        self.client.endpoints()
    }

    /// Lists the proposals with `status`, in registry order.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` on a non-2xx status or a body that is not a list
    /// of rows.
    pub async fn list(&self, status: ProposalStatus) -> ApplicationResult<Vec<Proposal>> {
        const OPERATION: &str = "list proposals";
        let response = self
            .call(OPERATION, RequestSpec::get(self.endpoints().proposals(status)))
            .await?;
        let rows: Vec<ProposalRow> = decode(OPERATION, &response)?;
        debug!(%status, count = rows.len(), "proposals listed");
        Ok(rows
            .into_iter()
            .map(|row| Proposal::from_row(row, status))
            .collect())
    }

    /// Fetches the full registration of `user_id`.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` on a non-2xx status or an unreadable body.
    pub async fn detail(&self, user_id: &str) -> ApplicationResult<ProducerDetail> {
        const OPERATION: &str = "load producer";
        let response = self
            .call(OPERATION, RequestSpec::get(self.endpoints().producer(user_id)))
            .await?;
        decode(OPERATION, &response)
    }

    /// Fetches the user record of `user_id`.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` on a non-2xx status or an unreadable body.
    pub async fn user_detail(&self, user_id: &str) -> ApplicationResult<UserDetail> {
        const OPERATION: &str = "load user";
        let response = self
            .call(OPERATION, RequestSpec::get(self.endpoints().user(user_id)))
            .await?;
        decode(OPERATION, &response)
    }

    /// Approves a pending proposal.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` unless the registry answers 204.
    pub async fn approve(&self, user_id: &str) -> ApplicationResult<()> {
        self.transition("approve", RequestSpec::post(self.endpoints().approve(user_id)))
            .await
    }

    /// Rejects a pending proposal. The reason is sent as plain text.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` unless the registry answers 204.
    pub async fn reject(&self, user_id: &str, reason: &RejectionReason) -> ApplicationResult<()> {
        let request = RequestSpec::post(self.endpoints().reject(user_id))
            .with_body(RequestBody::text(reason.as_str()));
        self.transition("reject", request).await
    }

    /// Moves an approved or rejected proposal back to pending.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` unless the registry answers 204.
    pub async fn reopen(&self, user_id: &str) -> ApplicationResult<()> {
        self.transition("reopen", RequestSpec::post(self.endpoints().reopen(user_id)))
            .await
    }

    /// Downloads a document with the current bearer token.
    ///
    /// A 401 does not start a refresh and leaves the session untouched.
    ///
    /// # Errors
    ///
    /// `DownloadFailed` for any failure, including a non-2xx status.
    pub async fn download(&self, url: &str) -> ApplicationResult<DownloadedDocument> {
        let response = self
            .client
            .send_with_bearer(RequestSpec::get(url))
            .await
            .map_err(|e| ApplicationError::DownloadFailed {
                message: e.to_string(),
            })?;
        if !response.is_success() {
            return Err(ApplicationError::DownloadFailed {
                message: format!("server answered {}", response.status),
            });
        }
        debug!(url, bytes = response.body.len(), "document downloaded");
        Ok(DownloadedDocument {
            content_type: response.content_type().map(str::to_owned),
            bytes: response.body,
        })
    }

    async fn call(
        &self,
        operation: &'static str,
        request: RequestSpec,
    ) -> ApplicationResult<ResponseSpec> {
        self.client.request(request).await.map_err(|e| match e {
            ApplicationError::Http(err) => ApplicationError::RemoteCallFailed {
                operation,
                status: None,
                message: err.to_string(),
            },
            other => other,
        })
    }

    async fn transition(&self, operation: &'static str, request: RequestSpec) -> ApplicationResult<()> {
        let response = self.call(operation, request).await?;
        if response.status == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(ApplicationError::unexpected_status(
                operation,
                response.status.as_u16(),
            ))
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    operation: &'static str,
    response: &ResponseSpec,
) -> ApplicationResult<T> {
    if !response.is_success() {
        return Err(ApplicationError::unexpected_status(
            operation,
            response.status.as_u16(),
        ));
    }
    response
        .json()
        .map_err(|e: DomainError| ApplicationError::RemoteCallFailed {
            operation,
            status: Some(response.status.as_u16()),
            message: e.to_string(),
        })
}
