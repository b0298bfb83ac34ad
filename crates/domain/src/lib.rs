//! PowerShare Domain - Core business types
//!
//! This crate defines the domain model for the PowerShare review console:
//! session credentials, producer-registration proposals, producer details
//! and the request/response shapes exchanged with the registry.
//! All types here are pure Rust with no I/O dependencies.

pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod producer;
pub mod proposal;
pub mod request;
pub mod response;

pub use credentials::CredentialPair;
pub use endpoints::ApiEndpoints;
pub use error::{DomainError, DomainResult};
pub use producer::{DocumentNumber, ProducerDetail, ProducerDocument, UserDetail};
pub use proposal::{
    Proposal, ProposalKind, ProposalRow, ProposalStatus, ProductionUnit, RejectionReason,
    SubmissionDate, sort_by_submission_desc, visible_proposals,
};
pub use request::{Header, Headers, HttpMethod, RequestBody, RequestSpec};
pub use response::{ResponseSpec, StatusCode};
