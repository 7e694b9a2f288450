use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use super::errors::{ActionError, ActionResult};
use super::events::{ChainEvent, EndOutcome};
use super::states::ChainState;
use crate::constants::events as event_names;
use crate::events::publisher::EventPublisher;
use crate::logging::log_chain_operation;
use crate::models::InterviewChain;

/// Trait for implementing state transition actions
#[async_trait]
pub trait StateAction<T> {
    /// Execute the action against the entity as it stands after the transition
    async fn execute(
        &self,
        entity: &T,
        from_state: ChainState,
        to_state: ChainState,
        event: &ChainEvent,
    ) -> ActionResult<()>;

    /// Get a description of this action for logging
    fn description(&self) -> &'static str;
}

/// Action to publish lifecycle events when chain transitions occur
pub struct PublishTransitionEventAction {
    event_publisher: Arc<EventPublisher>,
}

impl PublishTransitionEventAction {
    pub fn new(event_publisher: Arc<EventPublisher>) -> Self {
        Self { event_publisher }
    }
}

#[async_trait]
impl StateAction<InterviewChain> for PublishTransitionEventAction {
    async fn execute(
        &self,
        chain: &InterviewChain,
        from_state: ChainState,
        to_state: ChainState,
        event: &ChainEvent,
    ) -> ActionResult<()> {
        for event_name in determine_chain_event_names(event) {
            let context = build_chain_event_context(chain, from_state, to_state, event)?;

            self.event_publisher
                .publish(*event_name, context)
                .map_err(|_| ActionError::EventPublishFailed {
                    event_name: event_name.to_string(),
                })?;
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "Publish lifecycle event for chain transition"
    }
}

/// Action to write the canonical operation record for a transition
pub struct LogTransitionAction;

#[async_trait]
impl StateAction<InterviewChain> for LogTransitionAction {
    async fn execute(
        &self,
        chain: &InterviewChain,
        from_state: ChainState,
        to_state: ChainState,
        event: &ChainEvent,
    ) -> ActionResult<()> {
        let details = format!("{from_state} -> {to_state}, rounds={}", chain.rounds());
        log_chain_operation(
            event.event_type(),
            Some(chain.chain_uuid),
            chain.tip().map(|tip| tip.interview_uuid),
            &chain.status().to_string(),
            Some(&details),
        );

        if to_state.is_terminal() {
            tracing::info!(
                chain_uuid = %chain.chain_uuid,
                status = %chain.status(),
                rounds = chain.rounds(),
                "Chain reached a final outcome"
            );
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "Log chain transition"
    }
}

// Helper functions for event processing

fn determine_chain_event_names(event: &ChainEvent) -> &'static [&'static str] {
    match event {
        ChainEvent::Created => &[event_names::CHAIN_CREATED],
        ChainEvent::InterviewAdded => &[event_names::CHAIN_INTERVIEW_ADDED],
        ChainEvent::InterviewEdited(_) => &[event_names::CHAIN_INTERVIEW_EDITED],
        ChainEvent::EndInterview(EndOutcome::Next | EndOutcome::Rescheduled) => {
            &[event_names::CHAIN_SUCCESSOR_PENDING]
        }
        ChainEvent::EndInterview(_) => &[event_names::CHAIN_OUTCOME_FINALIZED],
        ChainEvent::SuccessorCreated(_) => &[
            event_names::CHAIN_INTERVIEW_ADDED,
            event_names::CHAIN_OUTCOME_FINALIZED,
        ],
        ChainEvent::SuccessorAbandoned => &[event_names::CHAIN_SUCCESSOR_CANCELLED],
    }
}

fn build_chain_event_context(
    chain: &InterviewChain,
    from_state: ChainState,
    to_state: ChainState,
    event: &ChainEvent,
) -> ActionResult<Value> {
    Ok(serde_json::json!({
        "chain_uuid": chain.chain_uuid,
        "tip_interview_uuid": chain.tip().map(|tip| tip.interview_uuid),
        "status": chain.status(),
        "rounds": chain.rounds(),
        "from_state": from_state,
        "to_state": to_state,
        "event": serde_json::to_value(event)?,
        "transitioned_at": Utc::now()
    }))
}
