//! Login and logout.

use std::sync::Arc;

use powershare_domain::request::CONTENT_TYPE;
use powershare_domain::{CredentialPair, RequestBody, RequestSpec};
use serde::Serialize;
use tracing::{info, warn};

use super::client::AuthenticatedClient;
use super::events::SessionEvent;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    senha: &'a str,
}

/// Session lifecycle use cases on top of an [`AuthenticatedClient`].
pub struct Session<C: HttpClient> {
    client: Arc<AuthenticatedClient<C>>,
}

impl<C: HttpClient> Session<C> {
    /// Creates the use case.
    pub const fn new(client: Arc<AuthenticatedClient<C>>) -> Self {
        Self { client }
    }

    /// Exchanges e-mail and password for a credential pair and stores it.
    ///
    /// The login call is sent without any bearer token.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if the auth service rejects the login or
    ///   answers without an access token.
    /// - `RemoteCallFailed` if the auth service cannot be reached.
    pub async fn login(&self, email: &str, senha: &str) -> ApplicationResult<()> {
        let body = RequestBody::json(&LoginRequest {
            email: email.trim(),
            senha,
        })
        .map_err(ApplicationError::Validation)?;
        let request = RequestSpec::post(self.client.endpoints().login())
            .with_header(CONTENT_TYPE, "application/json")
            .with_body(body);

        let response = self
            .client
            .transport()
            .execute(&request)
            .await
            .map_err(|e| ApplicationError::RemoteCallFailed {
                operation: "login",
                status: None,
                message: e.to_string(),
            })?;
        if !response.is_success() {
            warn!(status = %response.status, "login rejected");
            return Err(ApplicationError::InvalidCredentials);
        }

        let pair: CredentialPair = response
            .json()
            .map_err(|_| ApplicationError::InvalidCredentials)?;
        if pair.access_token.trim().is_empty() {
            return Err(ApplicationError::InvalidCredentials);
        }

        self.client.tokens().set(pair).await;
        self.client.events().emit(SessionEvent::LoggedIn);
        info!("logged in");
        Ok(())
    }

    /// Clears both tokens. Logging out twice is harmless.
    pub async fn logout(&self) {
        self.client.tokens().clear().await;
        self.client.events().emit(SessionEvent::LoggedOut);
        info!("logged out");
    }

    /// Returns true if a credential pair is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.client.tokens().is_authenticated().await
    }
}
