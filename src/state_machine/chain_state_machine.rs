use std::sync::Arc;
use uuid::Uuid;

use super::{
    actions::StateAction,
    errors::{internal_error, StateMachineError, StateMachineResult},
    events::{ChainEvent, DeferredKind, EndOutcome, OutcomeFinalization},
    guards::{
        ChainNotTerminalGuard, NoDeferredOutcomeGuard, PredecessorIsTipGuard, StateGuard,
        TipClosedGuard, TipInterviewGuard, TransitionGuard,
    },
    states::ChainState,
};
use crate::logging::log_error;
use crate::models::{ChainStatus, InterviewChain, InterviewPatch};

/// Shared handle to a transition action
pub type ChainAction = Arc<dyn StateAction<InterviewChain> + Send + Sync>;

/// What ending an interview with a given outcome requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Finalize the tip now
    Immediate {
        interview_uuid: Uuid,
        finalization: OutcomeFinalization,
        target_state: ChainState,
    },
    /// Hold a pending intent until a successor interview exists
    Deferred {
        kind: DeferredKind,
        predecessor_interview_uuid: Uuid,
    },
}

/// Transition engine for one chain.
///
/// Built from the session's view of the chain and whether a deferred
/// transition is pending for it. Planning never touches the backend; the
/// caller performs the backend calls and then commits the planned state.
pub struct ChainStateMachine {
    chain: InterviewChain,
    current_state: ChainState,
    actions: Vec<ChainAction>,
}

impl std::fmt::Debug for ChainStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainStateMachine")
            .field("chain_uuid", &self.chain.chain_uuid)
            .field("current_state", &self.current_state)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl ChainStateMachine {
    /// Create a state machine for a chain; `awaiting_successor` is true when
    /// a pending intent is held for it
    pub fn new(chain: InterviewChain, awaiting_successor: bool) -> StateMachineResult<Self> {
        if chain.interviews.is_empty() {
            return Err(internal_error(format!(
                "chain {} has no interviews",
                chain.chain_uuid
            )));
        }

        let derived = ChainState::from_status(chain.status());
        let current_state = if awaiting_successor && derived == ChainState::Active {
            ChainState::AwaitingSuccessor
        } else {
            derived
        };

        Ok(Self {
            chain,
            current_state,
            actions: Vec::new(),
        })
    }

    /// Attach actions run after every committed transition
    pub fn with_actions(mut self, actions: Vec<ChainAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn current_state(&self) -> ChainState {
        self.current_state
    }

    pub fn chain(&self) -> &InterviewChain {
        &self.chain
    }

    pub fn is_terminal(&self) -> bool {
        self.current_state.is_terminal()
    }

    /// Determine the target state based on current state and event
    pub fn determine_target_state(
        current_state: ChainState,
        event: &ChainEvent,
    ) -> StateMachineResult<ChainState> {
        use ChainState::*;

        let target = match (current_state, event) {
            (Active, ChainEvent::Created) => Active,

            // Immediate outcomes
            (Active, ChainEvent::EndInterview(EndOutcome::Offer { .. })) => Successful,
            (Active, ChainEvent::EndInterview(EndOutcome::Rejected { .. })) => Unsuccessful,
            (Active, ChainEvent::EndInterview(EndOutcome::PendingUpdate { .. })) => Active,

            // Deferred outcomes
            (
                Active | AwaitingSuccessor,
                ChainEvent::EndInterview(EndOutcome::Next | EndOutcome::Rescheduled),
            ) => AwaitingSuccessor,
            (AwaitingSuccessor, ChainEvent::SuccessorCreated(_)) => Active,
            (AwaitingSuccessor, ChainEvent::SuccessorAbandoned) => Active,

            // Direct mutations
            (Active, ChainEvent::InterviewAdded) => Active,
            (Active, ChainEvent::InterviewEdited(outcome)) => {
                ChainState::from_status(ChainStatus::from_latest_outcome(*outcome))
            }

            (from_state, _) => {
                return Err(StateMachineError::InvalidTransition {
                    from: from_state.to_string(),
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(target)
    }

    /// Check guard conditions for the transition.
    ///
    /// `subject` is the interview the event acts on: the tip for end and
    /// edit events, the predecessor for a successor creation.
    fn check_guards(
        &self,
        current_state: ChainState,
        target_state: ChainState,
        event: &ChainEvent,
        subject: Option<Uuid>,
    ) -> StateMachineResult<()> {
        TransitionGuard::can_transition(current_state, target_state, event)?;

        match event {
            ChainEvent::EndInterview(_) | ChainEvent::InterviewEdited(_) => {
                let interview_uuid = subject.ok_or_else(|| {
                    internal_error(format!("{} requires an interview", event.event_type()))
                })?;
                TipInterviewGuard { interview_uuid }.check(&self.chain)?;
                ChainNotTerminalGuard.check(&self.chain)?;
            }
            ChainEvent::InterviewAdded => {
                ChainNotTerminalGuard.check(&self.chain)?;
                TipClosedGuard.check(&self.chain)?;
            }
            ChainEvent::SuccessorCreated(kind) => {
                let predecessor_interview_uuid = subject.ok_or_else(|| {
                    internal_error("successor creation requires its predecessor")
                })?;
                ChainNotTerminalGuard.check(&self.chain)?;
                PredecessorIsTipGuard {
                    kind: *kind,
                    predecessor_interview_uuid,
                }
                .check(&self.chain)?;
            }
            ChainEvent::Created | ChainEvent::SuccessorAbandoned => {}
        }

        Ok(())
    }

    /// Validate an event against the current state and guards without
    /// changing anything, returning the state it would lead to
    pub fn plan(&self, event: &ChainEvent, subject: Option<Uuid>) -> StateMachineResult<ChainState> {
        let target_state = Self::determine_target_state(self.current_state, event)?;
        self.check_guards(self.current_state, target_state, event, subject)?;
        Ok(target_state)
    }

    /// Map an outcome chosen for an interview to what ending it requires
    pub fn resolve(&self, interview_uuid: Uuid, outcome: &EndOutcome) -> StateMachineResult<Resolution> {
        let event = ChainEvent::EndInterview(outcome.clone());
        let target_state = self.plan(&event, Some(interview_uuid))?;

        if let Some(kind) = outcome.deferred_kind() {
            return Ok(Resolution::Deferred {
                kind,
                predecessor_interview_uuid: interview_uuid,
            });
        }

        let finalization = outcome
            .immediate_finalization()
            .ok_or_else(|| internal_error(format!("{} has no finalization", outcome.choice())))?;

        Ok(Resolution::Immediate {
            interview_uuid,
            finalization,
            target_state,
        })
    }

    /// Plan an edit of the tip interview
    pub fn plan_edit(
        &self,
        interview_uuid: Uuid,
        patch: &InterviewPatch,
    ) -> StateMachineResult<(ChainEvent, ChainState)> {
        NoDeferredOutcomeGuard.check(patch)?;
        let event = ChainEvent::InterviewEdited(patch.interview_outcome);
        let target_state = self.plan(&event, Some(interview_uuid))?;
        Ok((event, target_state))
    }

    /// Plan a direct append outside a deferred transition
    pub fn plan_append(&self) -> StateMachineResult<ChainState> {
        self.plan(&ChainEvent::InterviewAdded, None)
    }

    /// Record a planned transition once its backend effects are durable,
    /// adopting the refreshed chain when one is available
    pub async fn commit(
        &mut self,
        event: &ChainEvent,
        target_state: ChainState,
        refreshed: Option<InterviewChain>,
    ) -> ChainState {
        let from_state = self.current_state;
        if let Some(chain) = refreshed {
            self.chain = chain;
        }
        self.current_state = target_state;

        tracing::debug!(
            chain_uuid = %self.chain.chain_uuid,
            from_state = %from_state,
            to_state = %target_state,
            event = event.event_type(),
            "Chain transition committed"
        );

        self.execute_actions(from_state, target_state, event).await;
        target_state
    }

    /// Plan and commit a transition that has no backend effect
    pub async fn transition(
        &mut self,
        event: ChainEvent,
        subject: Option<Uuid>,
    ) -> StateMachineResult<ChainState> {
        let target_state = self.plan(&event, subject)?;
        Ok(self.commit(&event, target_state, None).await)
    }

    /// Execute actions after a committed transition.
    ///
    /// The transition already happened, so action failures are logged
    /// rather than returned.
    async fn execute_actions(&self, from_state: ChainState, to_state: ChainState, event: &ChainEvent) {
        for action in &self.actions {
            if let Err(e) = action
                .execute(&self.chain, from_state, to_state, event)
                .await
            {
                tracing::warn!(
                    chain_uuid = %self.chain.chain_uuid,
                    action = action.description(),
                    error = %e,
                    "Transition action failed"
                );
                log_error(
                    "chain_state_machine",
                    action.description(),
                    &e.to_string(),
                    Some(&self.chain.chain_uuid.to_string()),
                );
            }
        }
    }
}
