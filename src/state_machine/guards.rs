use super::errors::{business_rule_violation, GuardError, GuardResult};
use super::events::{ChainEvent, DeferredKind, EndOutcome};
use super::states::ChainState;
use crate::models::{InterviewChain, InterviewOutcome, InterviewPatch};
use uuid::Uuid;

/// Trait for implementing state transition guards
pub trait StateGuard<T> {
    /// Check if a transition is allowed
    fn check(&self, entity: &T) -> GuardResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Guard conditions for state transitions
#[derive(Debug)]
pub struct TransitionGuard;

impl TransitionGuard {
    /// Check if a transition is valid
    pub fn can_transition(from: ChainState, to: ChainState, event: &ChainEvent) -> GuardResult<()> {
        use ChainState::*;

        // Terminal states cannot transition
        if from.is_terminal() {
            return Err(business_rule_violation(format!(
                "Cannot transition from terminal state {from}"
            )));
        }

        let valid = match (from, to, event) {
            (Active, Active, ChainEvent::Created) => true,

            // Immediate outcomes
            (Active, Successful, ChainEvent::EndInterview(EndOutcome::Offer { .. })) => true,
            (Active, Unsuccessful, ChainEvent::EndInterview(EndOutcome::Rejected { .. })) => true,
            (Active, Active, ChainEvent::EndInterview(EndOutcome::PendingUpdate { .. })) => true,

            // Deferred outcomes; choosing again replaces the pending intent
            (
                Active | AwaitingSuccessor,
                AwaitingSuccessor,
                ChainEvent::EndInterview(EndOutcome::Next | EndOutcome::Rescheduled),
            ) => true,
            (AwaitingSuccessor, Active, ChainEvent::SuccessorCreated(_)) => true,
            (AwaitingSuccessor, Active, ChainEvent::SuccessorAbandoned) => true,

            // Direct edits and appends
            (Active, Active, ChainEvent::InterviewAdded) => true,
            (Active, _, ChainEvent::InterviewEdited(_)) => true,

            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(business_rule_violation(format!(
                "Invalid transition from {from} to {to} with event {}",
                event.event_type()
            )))
        }
    }
}

/// Guard that an interview is the chain's current tip
#[derive(Debug)]
pub struct TipInterviewGuard {
    pub interview_uuid: Uuid,
}

impl StateGuard<InterviewChain> for TipInterviewGuard {
    fn check(&self, chain: &InterviewChain) -> GuardResult<()> {
        if chain.interview(self.interview_uuid).is_none() {
            return Err(GuardError::InterviewNotFound {
                chain_uuid: chain.chain_uuid,
                interview_uuid: self.interview_uuid,
            });
        }
        if !chain.is_tip(self.interview_uuid) {
            return Err(GuardError::NotTip {
                chain_uuid: chain.chain_uuid,
                interview_uuid: self.interview_uuid,
            });
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Interview must be the chain's most recent interview"
    }
}

/// Guard that the chain has not ended with an offer or rejection
#[derive(Debug)]
pub struct ChainNotTerminalGuard;

impl StateGuard<InterviewChain> for ChainNotTerminalGuard {
    fn check(&self, chain: &InterviewChain) -> GuardResult<()> {
        let status = chain.status();
        if status.is_terminal() {
            return Err(GuardError::ChainTerminal {
                chain_uuid: chain.chain_uuid,
                status: status.to_string(),
            });
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Chain must not already be Successful or Unsuccessful"
    }
}

/// Guard for appending outside a deferred transition: the tip must already
/// carry a closed outcome, otherwise appending would strand it as an open
/// predecessor
#[derive(Debug)]
pub struct TipClosedGuard;

impl StateGuard<InterviewChain> for TipClosedGuard {
    fn check(&self, chain: &InterviewChain) -> GuardResult<()> {
        match chain.tip() {
            Some(tip) if !tip.is_open() => Ok(()),
            Some(tip) => Err(business_rule_violation(format!(
                "Interview {} is still open; end it with Next or Rescheduled to add a round",
                tip.interview_uuid
            ))),
            None => Err(GuardError::InvalidState {
                state: format!("chain {} has no interviews", chain.chain_uuid),
            }),
        }
    }

    fn description(&self) -> &'static str {
        "Tip interview must carry a closed outcome before another is appended"
    }
}

/// Guard that an edit does not record an outcome reserved for the deferred path
#[derive(Debug)]
pub struct NoDeferredOutcomeGuard;

impl StateGuard<InterviewPatch> for NoDeferredOutcomeGuard {
    fn check(&self, patch: &InterviewPatch) -> GuardResult<()> {
        if patch.interview_outcome == Some(InterviewOutcome::Next) {
            return Err(business_rule_violation(
                "Next can only be recorded by creating the next interview",
            ));
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Edits must not record a Next outcome"
    }
}

/// Guard that a pending intent still points at the chain's tip
#[derive(Debug)]
pub struct PredecessorIsTipGuard {
    pub kind: DeferredKind,
    pub predecessor_interview_uuid: Uuid,
}

impl StateGuard<InterviewChain> for PredecessorIsTipGuard {
    fn check(&self, chain: &InterviewChain) -> GuardResult<()> {
        if chain.is_tip(self.predecessor_interview_uuid) {
            Ok(())
        } else {
            Err(business_rule_violation(format!(
                "{} successor for interview {} is stale; the chain has moved on",
                self.kind, self.predecessor_interview_uuid
            )))
        }
    }

    fn description(&self) -> &'static str {
        "Pending successor must still target the chain's tip"
    }
}
