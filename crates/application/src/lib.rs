//! PowerShare Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the HTTP transport and credential storage)
//! - Session handling: the token store, the refreshing client, login/logout
//! - The producer registry gateway and the review use cases
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;
pub mod registry;
pub mod use_cases;

#[cfg(test)]
mod testing;

pub use auth::{AuthenticatedClient, Session, SessionEvent, SessionEvents, TokenStore};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    CredentialStorage, HttpClient, HttpClientError, MemoryCredentialStorage, StorageError,
};
pub use registry::{DownloadedDocument, ProducerRegistry};
pub use use_cases::{DetailView, ProposalWorkflow};
