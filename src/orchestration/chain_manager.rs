//! # Chain Manager
//!
//! Session-scoped entry point for every interview chain action.
//!
//! ## Overview
//!
//! One `ChainManager` lives for one user session. It owns the session's chain
//! cache, the in-flight submission flags and the deferred commit coordinator,
//! and routes each user action through the same sequence:
//!
//! 1. validate the form locally (a failure makes no backend call)
//! 2. plan the transition against the cached chain
//! 3. raise the chain's in-flight flag, refusing any other action on it
//! 4. issue the backend call(s)
//! 5. re-read the chain, replace the cache entry, run transition actions
//!
//! A failed re-read is not fatal: the entry is marked stale and the derived
//! status may lag until the next successful fetch.

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::backend::{BackendError, ChainBackend};
use crate::config::EngineConfig;
use crate::constants::events::CHAIN_OUTCOME_FINALIZED;
use crate::error::{ChainError, Result};
use crate::events::publisher::{EventPublisher, PublishedEvent};
use crate::models::{ChainStatus, ContactStep, InterviewChain, InterviewDraft};
use crate::orchestration::in_flight::{InFlightGuard, InFlightRegistry, SubmissionKind};
use crate::projection::ChainProjection;
use crate::state_machine::{
    actions::{LogTransitionAction, PublishTransitionEventAction},
    errors::{internal_error, StateMachineError},
    ChainAction, ChainEvent, ChainState, ChainStateMachine, CommitReceipt,
    DeferredCommitCoordinator, PendingIntent, Resolution, UnreconciledFinalize,
};
use crate::validation::{FormFlow, OutcomeForm, StepValidator};

/// What ending an interview did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndInterviewResult {
    /// The outcome was recorded on the tip
    Finalized { status: ChainStatus },
    /// Next or Rescheduled: the add-interview dialog should open with this
    /// intent's prefill; nothing was sent to the backend
    AwaitingSuccessor(PendingIntent),
}

/// Session-scoped chain manager
pub struct ChainManager {
    session_uuid: Uuid,
    backend: Arc<dyn ChainBackend>,
    config: EngineConfig,
    cache: DashMap<Uuid, InterviewChain>,
    stale: DashSet<Uuid>,
    in_flight: InFlightRegistry,
    coordinator: DeferredCommitCoordinator,
    event_publisher: Arc<EventPublisher>,
    actions: Vec<ChainAction>,
}

impl std::fmt::Debug for ChainManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainManager")
            .field("session_uuid", &self.session_uuid)
            .field("cached_chains", &self.cache.len())
            .field("in_flight", &self.in_flight.len())
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl ChainManager {
    /// Create a manager for a new session
    pub fn new(backend: Arc<dyn ChainBackend>, config: EngineConfig) -> Self {
        let event_publisher = Arc::new(EventPublisher::new(
            config.session.event_channel_capacity,
        ));
        Self::with_event_publisher(backend, config, event_publisher)
    }

    /// Create a manager publishing into an existing event channel
    pub fn with_event_publisher(
        backend: Arc<dyn ChainBackend>,
        config: EngineConfig,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        let actions: Vec<ChainAction> = vec![
            Arc::new(PublishTransitionEventAction::new(event_publisher.clone())),
            Arc::new(LogTransitionAction),
        ];
        let session_uuid = Uuid::new_v4();
        debug!(session_uuid = %session_uuid, "Chain manager session started");

        Self {
            session_uuid,
            coordinator: DeferredCommitCoordinator::new(backend.clone(), event_publisher.clone()),
            backend,
            config,
            cache: DashMap::new(),
            stale: DashSet::new(),
            in_flight: InFlightRegistry::new(),
            event_publisher,
            actions,
        }
    }

    pub fn session_uuid(&self) -> Uuid {
        self.session_uuid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Receiver for lifecycle events published by this session
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.event_publisher.subscribe()
    }

    /// Validator for one of the wizard flows, using this session's rules
    pub fn step_validator(&self, flow: FormFlow) -> StepValidator {
        StepValidator::new(flow, self.config.validation.clone())
    }

    // ---- cache ------------------------------------------------------------

    /// Fetch a chain and replace its cache entry
    #[instrument(skip(self), fields(session_uuid = %self.session_uuid))]
    pub async fn load_chain(&self, chain_uuid: Uuid) -> Result<InterviewChain> {
        let chain = self
            .backend
            .fetch_chain(chain_uuid)
            .await
            .map_err(|e| match e {
                BackendError::NotFound { .. } => ChainError::ChainNotFound(chain_uuid),
                other => ChainError::Backend(other),
            })?;

        let violations = chain.check_invariants();
        if !violations.is_empty() {
            warn!(
                chain_uuid = %chain_uuid,
                violations = ?violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "Chain loaded with structural inconsistencies"
            );
        }

        self.cache.insert(chain_uuid, chain.clone());
        self.stale.remove(&chain_uuid);
        Ok(chain)
    }

    /// Re-read a chain, for hosts that want to clear a stale entry
    pub async fn refresh_chain(&self, chain_uuid: Uuid) -> Result<InterviewChain> {
        self.load_chain(chain_uuid).await
    }

    /// Replace the whole cache with the backend's chain list
    #[instrument(skip(self), fields(session_uuid = %self.session_uuid))]
    pub async fn load_chains(&self) -> Result<Vec<InterviewChain>> {
        let chains = self.backend.list_chains().await?;

        self.cache.clear();
        self.stale.clear();
        for chain in &chains {
            self.cache.insert(chain.chain_uuid, chain.clone());
        }

        debug!(count = chains.len(), "Chain list loaded");
        Ok(chains)
    }

    pub fn chain(&self, chain_uuid: Uuid) -> Option<InterviewChain> {
        self.cache.get(&chain_uuid).map(|entry| entry.value().clone())
    }

    /// Cached chains, most recent interview first
    pub fn chains(&self) -> Vec<InterviewChain> {
        let mut chains: Vec<InterviewChain> =
            self.cache.iter().map(|entry| entry.value().clone()).collect();
        chains.sort_by(|a, b| {
            b.latest_interview_date()
                .cmp(&a.latest_interview_date())
                .then_with(|| a.chain_uuid.cmp(&b.chain_uuid))
        });
        chains
    }

    pub fn chains_with_status(&self, status: ChainStatus) -> Vec<InterviewChain> {
        self.chains()
            .into_iter()
            .filter(|chain| chain.status() == status)
            .collect()
    }

    /// Whether the cache entry missed its post-mutation re-read
    pub fn is_stale(&self, chain_uuid: Uuid) -> bool {
        self.stale.contains(&chain_uuid)
    }

    /// Timeline view model for a cached chain
    pub fn projection(&self, chain_uuid: Uuid) -> Option<ChainProjection> {
        self.cache
            .get(&chain_uuid)
            .map(|entry| ChainProjection::from_chain(entry.value()))
    }

    async fn cached_or_load(&self, chain_uuid: Uuid) -> Result<InterviewChain> {
        match self.chain(chain_uuid) {
            Some(chain) => Ok(chain),
            None => self.load_chain(chain_uuid).await,
        }
    }

    /// Post-mutation re-read; failures leave the entry stale instead of failing
    async fn refresh_after_mutation(&self, chain_uuid: Uuid) -> Option<InterviewChain> {
        if !self.config.session.refresh_after_mutation {
            self.stale.insert(chain_uuid);
            return None;
        }

        match self.load_chain(chain_uuid).await {
            Ok(chain) => Some(chain),
            Err(e) => {
                warn!(
                    chain_uuid = %chain_uuid,
                    error = %e,
                    "Chain re-read failed after mutation; cached status may be stale"
                );
                self.stale.insert(chain_uuid);
                None
            }
        }
    }

    // ---- submissions ------------------------------------------------------

    fn acquire(&self, kind: SubmissionKind, chain_uuid: Option<Uuid>) -> Result<InFlightGuard> {
        self.in_flight.try_acquire(kind, chain_uuid).map_err(|held_by| {
            debug!(
                action = %kind,
                held_by = %held_by,
                chain_uuid = ?chain_uuid,
                "Submission ignored while another is in flight"
            );
            ChainError::SubmissionInFlight {
                action: kind,
                held_by,
                chain_uuid,
            }
        })
    }

    fn state_machine(&self, chain: InterviewChain) -> Result<ChainStateMachine> {
        let awaiting_successor = self.coordinator.has_pending(chain.chain_uuid);
        Ok(ChainStateMachine::new(chain, awaiting_successor)?.with_actions(self.actions.clone()))
    }

    fn ensure_interview(chain: &InterviewChain, interview_uuid: Uuid) -> Result<()> {
        if chain.interview(interview_uuid).is_none() {
            return Err(ChainError::InterviewNotFound {
                chain_uuid: chain.chain_uuid,
                interview_uuid,
            });
        }
        Ok(())
    }

    /// Create a chain with its first interview
    #[instrument(skip(self, draft), fields(session_uuid = %self.session_uuid))]
    pub async fn create_chain(&self, draft: &InterviewDraft) -> Result<Uuid> {
        let new_chain = self.step_validator(FormFlow::CreateChain).build_new_chain(draft)?;
        let _guard = self.acquire(SubmissionKind::CreateChain, None)?;

        let chain_uuid = self.backend.create_chain(&new_chain).await?;
        info!(
            chain_uuid = %chain_uuid,
            position = %new_chain.position,
            end_client_name = %new_chain.first_interview.end_client_name,
            "Chain created"
        );

        match self.refresh_after_mutation(chain_uuid).await {
            Some(chain) => {
                let mut machine = self.state_machine(chain)?;
                machine
                    .commit(&ChainEvent::Created, ChainState::Active, None)
                    .await;
            }
            None => debug!(chain_uuid = %chain_uuid, "Chain created without a fresh read"),
        }

        Ok(chain_uuid)
    }

    /// Submit the add-interview form for a chain.
    ///
    /// With a pending Next/Rescheduled intent this is the deferred commit;
    /// otherwise it appends directly, which requires the tip to carry a
    /// closed outcome already. Returns the new interview's id.
    #[instrument(skip(self, draft), fields(session_uuid = %self.session_uuid))]
    pub async fn add_interview(&self, chain_uuid: Uuid, draft: &InterviewDraft) -> Result<Uuid> {
        let chain = self.cached_or_load(chain_uuid).await?;
        let intent = self.coordinator.pending(chain_uuid);

        let mut draft = draft.clone();
        if let Some(intent) = &intent {
            draft.prefill_contact(&intent.prefill);
        }
        draft.prefill_contact(&ContactStep {
            end_client_name: Some(chain.end_client_name.clone()),
            ..ContactStep::default()
        });

        // A validation failure keeps the pending intent so the user can fix the form
        let new_interview = self.step_validator(FormFlow::AddInterview).build_new_interview(&draft)?;
        let _guard = self.acquire(SubmissionKind::AddInterview, Some(chain_uuid))?;
        let mut machine = self.state_machine(chain)?;

        let Some(intent) = intent else {
            let target_state = machine.plan_append()?;
            let interview_uuid = self.backend.add_interview(chain_uuid, &new_interview).await?;
            let refreshed = self.refresh_after_mutation(chain_uuid).await;
            machine
                .commit(&ChainEvent::InterviewAdded, target_state, refreshed)
                .await;
            return Ok(interview_uuid);
        };

        let event = ChainEvent::SuccessorCreated(intent.kind);
        let target_state = match machine.plan(&event, Some(intent.predecessor_interview_uuid)) {
            Ok(state) => state,
            Err(e) => {
                self.coordinator.discard(chain_uuid);
                warn!(chain_uuid = %chain_uuid, error = %e, "Pending successor no longer applies");
                return Err(match e {
                    StateMachineError::GuardFailed(_) => ChainError::StaleIntent { chain_uuid },
                    other => other.into(),
                });
            }
        };

        match self.coordinator.commit(machine.chain(), new_interview).await {
            Ok(receipt) => {
                let refreshed = self.refresh_after_mutation(chain_uuid).await;
                machine.commit(&event, target_state, refreshed).await;
                Ok(receipt.successor_interview_uuid)
            }
            Err(e @ ChainError::DeferredFinalizeFailed { .. }) => {
                // The successor exists; show it even though its predecessor is open
                self.refresh_after_mutation(chain_uuid).await;
                Err(e)
            }
            Err(e) => {
                machine
                    .commit(&ChainEvent::SuccessorAbandoned, ChainState::Active, None)
                    .await;
                Err(e)
            }
        }
    }

    /// Submit the edit form for the chain's tip interview
    #[instrument(skip(self, draft), fields(session_uuid = %self.session_uuid))]
    pub async fn edit_interview(
        &self,
        chain_uuid: Uuid,
        interview_uuid: Uuid,
        draft: &InterviewDraft,
    ) -> Result<()> {
        let chain = self.cached_or_load(chain_uuid).await?;
        Self::ensure_interview(&chain, interview_uuid)?;

        let mut draft = draft.clone();
        draft.prefill_contact(&ContactStep {
            end_client_name: Some(chain.end_client_name.clone()),
            ..ContactStep::default()
        });

        let patch = self.step_validator(FormFlow::EditInterview).build_patch(&draft)?;
        let mut machine = self.state_machine(chain)?;
        let (event, target_state) = machine.plan_edit(interview_uuid, &patch)?;

        let _guard = self.acquire(SubmissionKind::EditInterview, Some(chain_uuid))?;
        self.backend.edit_interview(interview_uuid, &patch).await?;

        let refreshed = self.refresh_after_mutation(chain_uuid).await;
        machine.commit(&event, target_state, refreshed).await;
        Ok(())
    }

    /// Submit the End Interview dialog for the chain's tip
    #[instrument(skip(self, form), fields(session_uuid = %self.session_uuid))]
    pub async fn end_interview(
        &self,
        chain_uuid: Uuid,
        interview_uuid: Uuid,
        form: &OutcomeForm,
    ) -> Result<EndInterviewResult> {
        let outcome = form.build()?;
        let chain = self.cached_or_load(chain_uuid).await?;
        Self::ensure_interview(&chain, interview_uuid)?;

        let _guard = self.acquire(SubmissionKind::EndInterview, Some(chain_uuid))?;
        let mut machine = self.state_machine(chain)?;
        let event = ChainEvent::EndInterview(outcome.clone());

        match machine.resolve(interview_uuid, &outcome)? {
            Resolution::Immediate {
                interview_uuid,
                finalization,
                target_state,
            } => {
                self.backend
                    .finalize_outcome(interview_uuid, &finalization)
                    .await?;
                let refreshed = self.refresh_after_mutation(chain_uuid).await;
                let state = machine.commit(&event, target_state, refreshed).await;
                Ok(EndInterviewResult::Finalized {
                    status: state.status(),
                })
            }
            Resolution::Deferred { kind, .. } => {
                let intent = PendingIntent::for_tip(machine.chain(), kind)
                    .ok_or_else(|| internal_error(format!("chain {chain_uuid} has no tip")))?;
                self.coordinator.record(intent.clone());
                machine
                    .commit(&event, ChainState::AwaitingSuccessor, None)
                    .await;
                Ok(EndInterviewResult::AwaitingSuccessor(intent))
            }
        }
    }

    // ---- deferred transitions ---------------------------------------------

    pub fn pending_intent(&self, chain_uuid: Uuid) -> Option<PendingIntent> {
        self.coordinator.pending(chain_uuid)
    }

    /// Draft to open the add-interview dialog with, prefilled from the
    /// pending intent's predecessor when there is one
    pub fn successor_draft(&self, chain_uuid: Uuid) -> InterviewDraft {
        self.coordinator
            .pending(chain_uuid)
            .map(|intent| intent.seed_draft())
            .unwrap_or_default()
    }

    /// Draft to open the edit dialog with
    pub fn edit_draft(&self, chain_uuid: Uuid, interview_uuid: Uuid) -> Result<InterviewDraft> {
        let chain = self
            .chain(chain_uuid)
            .ok_or(ChainError::ChainNotFound(chain_uuid))?;
        chain
            .interview(interview_uuid)
            .map(InterviewDraft::from_interview)
            .ok_or(ChainError::InterviewNotFound {
                chain_uuid,
                interview_uuid,
            })
    }

    /// The add-interview dialog of a deferred transition was closed.
    ///
    /// Nothing was sent, so nothing needs undoing.
    pub async fn cancel_pending(&self, chain_uuid: Uuid) -> Result<PendingIntent> {
        let chain = self.chain(chain_uuid);
        let mut machine = match chain {
            Some(chain) => Some(self.state_machine(chain)?),
            None => None,
        };

        let intent = self
            .coordinator
            .discard(chain_uuid)
            .ok_or(ChainError::NoPendingIntent(chain_uuid))?;

        if let Some(machine) = machine.as_mut() {
            machine
                .commit(&ChainEvent::SuccessorAbandoned, ChainState::Active, None)
                .await;
        }
        info!(chain_uuid = %chain_uuid, kind = %intent.kind, "Pending successor cancelled");
        Ok(intent)
    }

    /// Successors whose predecessor's outcome was never recorded
    pub fn unreconciled(&self) -> Vec<UnreconciledFinalize> {
        self.coordinator.unreconciled()
    }

    /// Manually re-issue a failed deferred finalize
    #[instrument(skip(self), fields(session_uuid = %self.session_uuid))]
    pub async fn retry_finalize(&self, chain_uuid: Uuid) -> Result<CommitReceipt> {
        let _guard = self.acquire(SubmissionKind::RetryFinalize, Some(chain_uuid))?;
        let receipt = self.coordinator.retry_finalize(chain_uuid).await?;

        let refreshed = self.refresh_after_mutation(chain_uuid).await;
        let context = serde_json::json!({
            "chain_uuid": chain_uuid,
            "interview_uuid": receipt.predecessor_interview_uuid,
            "successor_interview_uuid": receipt.successor_interview_uuid,
            "kind": receipt.kind,
            "status": refreshed.as_ref().map(|chain| chain.status()),
            "reconciled": true,
        });
        if let Err(e) = self.event_publisher.publish(CHAIN_OUTCOME_FINALIZED, context) {
            warn!(chain_uuid = %chain_uuid, error = %e, "Failed to publish reconciled finalize");
        }

        Ok(receipt)
    }
}
