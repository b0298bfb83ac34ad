//! Use cases
//!
//! Each use case orchestrates registry calls around a piece of review state.

mod detail_view;
mod proposal_workflow;

pub use detail_view::DetailView;
pub use proposal_workflow::ProposalWorkflow;
