//! Producer-registration proposals under review.

mod model;
mod ordering;
mod reason;
mod status;

pub use model::{Proposal, ProposalKind, ProposalRow, ProductionUnit};
pub use ordering::{SubmissionDate, matches_search, sort_by_submission_desc, visible_proposals};
pub use reason::{MIN_REASON_LEN, RejectionReason};
pub use status::ProposalStatus;
