//! Authenticated HTTP client with transparent token refresh.
//!
//! Every outbound call gets the current bearer token. When the server
//! answers 401 the client exchanges the refresh token for a new pair and
//! retries the original request exactly once. If the refresh is not
//! possible the session is invalidated: the token store is cleared and
//! [`SessionEvent::Invalidated`] is emitted.

use std::sync::Arc;

use powershare_domain::request::{AUTHORIZATION, CONTENT_TYPE};
use powershare_domain::{ApiEndpoints, CredentialPair, RequestBody, RequestSpec, ResponseSpec};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::events::{SessionEvent, SessionEvents};
use super::token_store::TokenStore;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;

const JSON: &str = "application/json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// HTTP client that attaches credentials and recovers from expired tokens.
///
/// Concurrent requests rejected with the same access token share a single
/// refresh call: the first one through the refresh gate performs the
/// exchange and the others reuse its result.
pub struct AuthenticatedClient<C: HttpClient> {
    transport: Arc<C>,
    tokens: TokenStore,
    events: SessionEvents,
    endpoints: ApiEndpoints,
    refresh_gate: Mutex<()>,
}

impl<C: HttpClient> AuthenticatedClient<C> {
    /// Creates a client over `transport`.
    pub fn new(
        transport: Arc<C>,
        tokens: TokenStore,
        events: SessionEvents,
        endpoints: ApiEndpoints,
    ) -> Self {
        Self {
            transport,
            tokens,
            events,
            endpoints,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Returns the token store this client reads credentials from.
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Returns the session event channel.
    pub const fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Returns the service endpoints.
    pub const fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Returns the underlying transport, for calls that must not carry
    /// credentials.
    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// Sends `request` with the current bearer token.
    ///
    /// A 401 triggers one refresh and one retry; the retried response is
    /// returned whatever its status. Every other response, including
    /// non-2xx ones, is returned as is.
    ///
    /// # Errors
    ///
    /// - `SessionInvalid` if no credentials are stored or the refresh fails;
    ///   the store is cleared and `Invalidated` is emitted first.
    /// - `Http` if no response was received.
    pub async fn request(&self, request: RequestSpec) -> ApplicationResult<ResponseSpec> {
        let Some(credentials) = self.tokens.get().await else {
            return Err(self.invalidate("no credentials stored".to_string()).await);
        };

        let response = self.send(&request, &credentials).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        debug!(url = %request.url, "access token rejected");
        let fresh = match self.refresh_after_rejection(&credentials.access_token).await {
            Ok(pair) => pair,
            Err(reason) => return Err(self.invalidate(reason).await),
        };
        self.send(&request, &fresh).await
    }

    /// Sends `request` once with the current bearer token, without the
    /// refresh cycle. A 401 is returned to the caller and the session is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// - `SessionInvalid` if no credentials are stored.
    /// - `Http` if no response was received.
    pub async fn send_with_bearer(&self, request: RequestSpec) -> ApplicationResult<ResponseSpec> {
        let Some(credentials) = self.tokens.get().await else {
            return Err(ApplicationError::SessionInvalid {
                reason: "no credentials stored".to_string(),
            });
        };
        self.send(&request, &credentials).await
    }

    async fn send(
        &self,
        request: &RequestSpec,
        credentials: &CredentialPair,
    ) -> ApplicationResult<ResponseSpec> {
        let mut outbound = request.clone();
        outbound.headers.set(AUTHORIZATION, credentials.authorization_header());
        if let Some(body) = &outbound.body
            && !outbound.headers.contains(CONTENT_TYPE)
        {
            let content_type = body.content_type().unwrap_or(JSON).to_string();
            outbound.headers.set(CONTENT_TYPE, content_type);
        }

        debug!(method = %outbound.method, url = %outbound.url, "sending request");
        let response = self.transport.execute(&outbound).await?;
        debug!(url = %outbound.url, status = %response.status, "response received");
        Ok(response)
    }

    /// Returns a usable pair after `rejected` got a 401, or the reason the
    /// session cannot continue.
    async fn refresh_after_rejection(&self, rejected: &str) -> Result<CredentialPair, String> {
        let _gate = self.refresh_gate.lock().await;

        let Some(current) = self.tokens.get().await else {
            return Err("session ended while waiting for refresh".to_string());
        };
        if current.access_token != rejected {
            debug!("credentials already refreshed by a concurrent request");
            return Ok(current);
        }
        let Some(refresh_token) = current.refresh_token() else {
            self.tokens.clear().await;
            return Err("refresh token not found".to_string());
        };

        match self.exchange(refresh_token).await {
            Ok(pair) => {
                self.tokens.set(pair.clone()).await;
                self.events.emit(SessionEvent::Refreshed);
                info!("session refreshed");
                Ok(pair)
            }
            Err(reason) => {
                // Cleared while the gate is held so waiters see the outcome.
                self.tokens.clear().await;
                Err(reason)
            }
        }
    }

    async fn exchange(&self, refresh_token: &str) -> Result<CredentialPair, String> {
        let body = RequestBody::json(&RefreshRequest { refresh_token }).map_err(|e| e.to_string())?;
        let request = RequestSpec::post(self.endpoints.refresh())
            .with_header(CONTENT_TYPE, JSON)
            .with_body(body);

        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(|e| format!("refresh request failed: {e}"))?;
        if !response.is_success() {
            return Err(format!("refresh rejected with status {}", response.status.as_u16()));
        }

        let mut pair: CredentialPair = response
            .json()
            .map_err(|e| format!("invalid refresh response: {e}"))?;
        if pair.access_token.trim().is_empty() {
            return Err("refresh response has no access token".to_string());
        }
        if pair.refresh_token().is_none() {
            refresh_token.clone_into(&mut pair.refresh_token);
        }
        Ok(pair)
    }

    async fn invalidate(&self, reason: String) -> ApplicationError {
        self.tokens.clear().await;
        warn!(%reason, "session invalidated");
        self.events.emit(SessionEvent::Invalidated {
            reason: reason.clone(),
        });
        ApplicationError::SessionInvalid { reason }
    }
}
