//! Proposal review workflow
//!
//! Holds the working list for one status filter and drives the
//! approve/reject/reopen transitions against the registry.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use powershare_domain::{Proposal, ProposalStatus, RejectionReason, visible_proposals};
use tracing::{debug, info, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::HttpClient;
use crate::registry::ProducerRegistry;

#[derive(Debug)]
struct Settled {
    user_id: String,
    left: ProposalStatus,
    generation: u64,
}

#[derive(Debug, Default)]
struct WorkflowState {
    status: ProposalStatus,
    proposals: Vec<Proposal>,
    loading: bool,
    in_flight: HashSet<String>,
    generation: u64,
    /// Transitions confirmed while a load was pending: the id, the status it
    /// left and the load generation current at confirmation. A load of that
    /// status up to that generation drops the id.
    settled: Vec<Settled>,
}

/// Review workflow over the proposals of one status filter.
///
/// A proposal leaves the working list only after the registry confirmed
/// its transition; failures leave the list untouched.
pub struct ProposalWorkflow<C: HttpClient> {
    registry: Arc<ProducerRegistry<C>>,
    state: Mutex<WorkflowState>,
}

impl<C: HttpClient> ProposalWorkflow<C> {
    /// Creates a workflow with an empty `PENDING` list.
    pub fn new(registry: Arc<ProducerRegistry<C>>) -> Self {
        Self {
            registry,
            state: Mutex::new(WorkflowState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the proposals with `status` and makes them the working list.
    ///
    /// If another load starts before this one finishes, this result is
    /// still returned but does not replace the working list. Proposals whose
    /// transition was confirmed after this load started are left out.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` or `SessionInvalid`; the previous list and filter
    /// are kept.
    pub async fn load_proposals(&self, status: ProposalStatus) -> ApplicationResult<Vec<Proposal>> {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let mut result = self.registry.list(status).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!(%status, "discarding listing superseded by a newer load");
            return result;
        }
        state.loading = false;
        let settled = std::mem::take(&mut state.settled);
        match &mut result {
            Ok(proposals) => {
                proposals.retain(|p| {
                    !settled.iter().any(|s| {
                        s.left == status && s.generation >= generation && s.user_id == p.user_id
                    })
                });
                state.status = status;
                state.proposals.clone_from(proposals);
            }
            Err(e) => warn!(%status, error = %e, "could not load proposals"),
        }
        result
    }

    /// Approves a pending proposal and removes it from the working list.
    ///
    /// # Errors
    ///
    /// `TransitionInFlight`, `RemoteCallFailed` or `SessionInvalid`.
    pub async fn approve(&self, user_id: &str) -> ApplicationResult<()> {
        let _guard = self.begin_transition(user_id)?;
        self.finish("approve", user_id, self.registry.approve(user_id).await)
    }

    /// Rejects a pending proposal with `reason` and removes it from the
    /// working list.
    ///
    /// The reason is validated before anything is sent.
    ///
    /// # Errors
    ///
    /// `Validation` if the trimmed reason is too short, then
    /// `TransitionInFlight`, `RemoteCallFailed` or `SessionInvalid`.
    pub async fn reject(&self, user_id: &str, reason: &str) -> ApplicationResult<()> {
        let reason = RejectionReason::parse(reason).map_err(ApplicationError::Validation)?;
        let _guard = self.begin_transition(user_id)?;
        self.finish("reject", user_id, self.registry.reject(user_id, &reason).await)
    }

    /// Moves an approved or rejected proposal back to pending and removes it
    /// from the working list.
    ///
    /// # Errors
    ///
    /// `TransitionInFlight`, `RemoteCallFailed` or `SessionInvalid`.
    pub async fn reopen(&self, user_id: &str) -> ApplicationResult<()> {
        let _guard = self.begin_transition(user_id)?;
        self.finish("reopen", user_id, self.registry.reopen(user_id).await)
    }

    /// Returns the working list filtered by `search` and ordered newest first.
    #[must_use]
    pub fn visible(&self, search: &str) -> Vec<Proposal> {
        visible_proposals(&self.state().proposals, search)
    }

    /// Returns the status filter of the working list.
    #[must_use]
    pub fn status(&self) -> ProposalStatus {
        self.state().status
    }

    /// Returns the working list in registry order.
    #[must_use]
    pub fn proposals(&self) -> Vec<Proposal> {
        self.state().proposals.clone()
    }

    /// Returns true while a load is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Returns true while a transition for `user_id` is pending.
    #[must_use]
    pub fn is_in_flight(&self, user_id: &str) -> bool {
        self.state().in_flight.contains(user_id)
    }

    fn begin_transition(&self, user_id: &str) -> ApplicationResult<InFlight<'_>> {
        if !self.state().in_flight.insert(user_id.to_string()) {
            return Err(ApplicationError::TransitionInFlight {
                user_id: user_id.to_string(),
            });
        }
        Ok(InFlight {
            state: &self.state,
            user_id: user_id.to_string(),
        })
    }

    fn finish(
        &self,
        operation: &'static str,
        user_id: &str,
        outcome: ApplicationResult<()>,
    ) -> ApplicationResult<()> {
        match outcome {
            Ok(()) => {
                let mut state = self.state();
                state.proposals.retain(|p| p.user_id != user_id);
                if state.loading {
                    let settled = Settled {
                        user_id: user_id.to_string(),
                        left: state.status,
                        generation: state.generation,
                    };
                    state.settled.push(settled);
                }
                drop(state);
                info!(user_id, operation, "proposal transitioned");
                Ok(())
            }
            Err(e) => {
                warn!(user_id, operation, error = %e, "proposal transition failed");
                Err(e)
            }
        }
    }
}

/// Marks a transition as in flight until dropped.
struct InFlight<'a> {
    state: &'a Mutex<WorkflowState>,
    user_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&self.user_id);
    }
}
