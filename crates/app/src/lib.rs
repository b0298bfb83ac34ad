//! PowerShare console shell
//!
//! Wires the application use cases to the infrastructure adapters and
//! exposes the command-line surface used by the `powershare` binary.

pub mod cli;
pub mod render;

use std::sync::Arc;

use anyhow::Context;
use powershare_application::{
    AuthenticatedClient, CredentialStorage, DetailView, HttpClient, MemoryCredentialStorage,
    ProducerRegistry, ProposalWorkflow, Session, SessionEvents, TokenStore,
};
use powershare_domain::ApiEndpoints;
use powershare_infrastructure::{AppConfig, FileCredentialStorage, ReqwestHttpClient};
use tracing::warn;

/// The review console's use cases, sharing one authenticated client.
pub struct Console<C: HttpClient> {
    client: Arc<AuthenticatedClient<C>>,
    registry: Arc<ProducerRegistry<C>>,
    session: Session<C>,
    workflow: ProposalWorkflow<C>,
}

impl<C: HttpClient> Console<C> {
    /// Builds the use cases over `transport`.
    pub fn new(
        transport: Arc<C>,
        tokens: TokenStore,
        events: SessionEvents,
        endpoints: ApiEndpoints,
    ) -> Self {
        let client = Arc::new(AuthenticatedClient::new(transport, tokens, events, endpoints));
        let registry = Arc::new(ProducerRegistry::new(client.clone()));
        Self {
            session: Session::new(client.clone()),
            workflow: ProposalWorkflow::new(registry.clone()),
            registry,
            client,
        }
    }

    /// Login and logout.
    pub const fn session(&self) -> &Session<C> {
        &self.session
    }

    /// The proposal review workflow.
    pub const fn workflow(&self) -> &ProposalWorkflow<C> {
        &self.workflow
    }

    /// Direct registry access.
    pub fn registry(&self) -> &ProducerRegistry<C> {
        &self.registry
    }

    /// The session's token store.
    pub fn tokens(&self) -> &TokenStore {
        self.client.tokens()
    }

    /// Opens a detail view for one producer.
    pub fn open_detail(&self, user_id: &str) -> DetailView<C> {
        DetailView::open(self.registry.clone(), user_id)
    }
}

/// Builds a console talking to the configured services, restoring any
/// persisted session.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created.
pub async fn connect(
    config: &AppConfig,
    events: SessionEvents,
) -> anyhow::Result<Console<ReqwestHttpClient>> {
    let storage: Arc<dyn CredentialStorage> = if let Some(path) = config.session_path() {
        Arc::new(FileCredentialStorage::new(path))
    } else {
        warn!("no data directory available, the session will not be kept");
        Arc::new(MemoryCredentialStorage::default())
    };
    let tokens = TokenStore::load(storage).await;
    let transport = Arc::new(ReqwestHttpClient::new().context("could not create HTTP client")?);
    Ok(Console::new(
        transport,
        tokens,
        events,
        config.endpoints.clone(),
    ))
}
