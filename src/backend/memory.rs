//! In-memory chain backend.
//!
//! Assigns identifiers and stores chains in process memory. Embedding hosts
//! without a server use it directly and the integration tests wrap it.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{BackendError, BackendResult, ChainBackend};
use crate::models::{Interview, InterviewChain, InterviewPatch, NewChain, NewInterview};
use crate::state_machine::events::{FinalizationNote, OutcomeFinalization};

#[derive(Debug, Default)]
struct Store {
    chains: HashMap<Uuid, InterviewChain>,
    /// interview_uuid -> chain_uuid
    interview_index: HashMap<Uuid, Uuid>,
    /// Creation order, for stable listings
    order: Vec<Uuid>,
}

impl Store {
    fn interview_mut(&mut self, interview_uuid: Uuid) -> BackendResult<&mut Interview> {
        let chain_uuid = *self
            .interview_index
            .get(&interview_uuid)
            .ok_or_else(|| BackendError::interview_not_found(interview_uuid))?;
        self.chains
            .get_mut(&chain_uuid)
            .and_then(|chain| {
                chain
                    .interviews
                    .iter_mut()
                    .find(|i| i.interview_uuid == interview_uuid)
            })
            .ok_or_else(|| BackendError::interview_not_found(interview_uuid))
    }
}

/// Backend keeping every chain in memory behind a single lock
#[derive(Debug, Default)]
pub struct InMemoryChainBackend {
    store: RwLock<Store>,
    actor: Option<String>,
}

impl InMemoryChainBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `created_by` / `updated_by` with this actor on every mutation
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            store: RwLock::default(),
            actor: Some(actor.into()),
        }
    }

    pub fn chain_count(&self) -> usize {
        self.store.read().chains.len()
    }

    fn build_interview(
        &self,
        chain_uuid: Uuid,
        parent_interview_uuid: Option<Uuid>,
        new: &NewInterview,
    ) -> Interview {
        let now = Utc::now();
        Interview {
            interview_uuid: Uuid::new_v4(),
            chain_uuid,
            parent_interview_uuid,
            end_client_name: new.end_client_name.clone(),
            end_client_recruiter_name: new.end_client_recruiter_name.clone(),
            end_client_recruiter_email: new.end_client_recruiter_email.clone(),
            end_client_recruiter_phone: new.end_client_recruiter_phone.clone(),
            interview_date: new.interview_date,
            start_time: new.start_time,
            end_time: new.end_time,
            interview_method: new.interview_method,
            interview_type: new.interview_type,
            interview_status: new.interview_status,
            interview_outcome: None,
            rejection_reason: None,
            is_reschedule: new.is_reschedule,
            comments: new.comments.clone(),
            interview_feedback: new.interview_feedback.clone(),
            job_board: new.job_board.clone(),
            created_by: self.actor.clone(),
            created_at: now,
            updated_by: self.actor.clone(),
            updated_at: now,
        }
    }
}

#[async_trait]
impl ChainBackend for InMemoryChainBackend {
    async fn create_chain(&self, new: &NewChain) -> BackendResult<Uuid> {
        let mut store = self.store.write();

        let duplicate = store.chains.values().any(|chain| {
            !chain.status().is_terminal()
                && chain.recruiter == new.recruiter
                && chain.client == new.client
                && chain.position == new.position
                && chain.end_client_name == new.first_interview.end_client_name
        });
        if duplicate {
            return Err(BackendError::Conflict(format!(
                "an active chain for {} at {} already exists",
                new.position, new.first_interview.end_client_name
            )));
        }

        let chain_uuid = Uuid::new_v4();
        let first = self.build_interview(chain_uuid, None, &new.first_interview);
        let interview_uuid = first.interview_uuid;

        store.chains.insert(
            chain_uuid,
            InterviewChain {
                chain_uuid,
                end_client_name: new.first_interview.end_client_name.clone(),
                client: new.client.clone(),
                recruiter: new.recruiter.clone(),
                position: new.position.clone(),
                interviews: vec![first],
            },
        );
        store.interview_index.insert(interview_uuid, chain_uuid);
        store.order.push(chain_uuid);

        debug!(chain_uuid = %chain_uuid, interview_uuid = %interview_uuid, "Chain stored");
        Ok(chain_uuid)
    }

    async fn add_interview(&self, chain_uuid: Uuid, new: &NewInterview) -> BackendResult<Uuid> {
        let mut store = self.store.write();
        let parent = store
            .chains
            .get(&chain_uuid)
            .ok_or_else(|| BackendError::chain_not_found(chain_uuid))?
            .tip()
            .map(|tip| tip.interview_uuid);

        let interview = self.build_interview(chain_uuid, parent, new);
        let interview_uuid = interview.interview_uuid;

        if let Some(chain) = store.chains.get_mut(&chain_uuid) {
            chain.interviews.push(interview);
        }
        store.interview_index.insert(interview_uuid, chain_uuid);

        debug!(
            chain_uuid = %chain_uuid,
            interview_uuid = %interview_uuid,
            parent_interview_uuid = ?parent,
            "Interview appended"
        );
        Ok(interview_uuid)
    }

    async fn edit_interview(&self, interview_uuid: Uuid, patch: &InterviewPatch) -> BackendResult<()> {
        let actor = self.actor.clone();
        let mut store = self.store.write();
        let interview = store.interview_mut(interview_uuid)?;

        interview.interview_date = patch.interview_date;
        interview.start_time = patch.start_time;
        interview.end_time = patch.end_time;
        interview.interview_type = patch.interview_type;
        interview.interview_method = patch.interview_method;
        interview.interview_status = patch.interview_status;
        interview.interview_outcome = patch.interview_outcome;
        interview.rejection_reason = patch.rejection_reason;
        interview.end_client_name = patch.end_client_name.clone();
        interview.end_client_recruiter_name = patch.end_client_recruiter_name.clone();
        interview.end_client_recruiter_email = patch.end_client_recruiter_email.clone();
        interview.end_client_recruiter_phone = patch.end_client_recruiter_phone.clone();
        interview.comments = patch.comments.clone();
        interview.interview_feedback = patch.interview_feedback.clone();
        interview.job_board = patch.job_board.clone();
        interview.updated_by = actor;
        interview.updated_at = Utc::now();

        Ok(())
    }

    async fn finalize_outcome(
        &self,
        interview_uuid: Uuid,
        finalization: &OutcomeFinalization,
    ) -> BackendResult<()> {
        let actor = self.actor.clone();
        let mut store = self.store.write();
        let interview = store.interview_mut(interview_uuid)?;

        interview.interview_outcome = Some(finalization.outcome);
        if let Some(status) = finalization.interview_status {
            interview.interview_status = status;
        }
        match &finalization.note {
            FinalizationNote::None => interview.rejection_reason = None,
            FinalizationNote::Comment(comment) => {
                interview.rejection_reason = None;
                interview.interview_feedback = Some(comment.clone());
            }
            FinalizationNote::Reason(reason) => interview.rejection_reason = Some(*reason),
        }
        interview.updated_by = actor;
        interview.updated_at = Utc::now();

        Ok(())
    }

    async fn fetch_chain(&self, chain_uuid: Uuid) -> BackendResult<InterviewChain> {
        self.store
            .read()
            .chains
            .get(&chain_uuid)
            .cloned()
            .ok_or_else(|| BackendError::chain_not_found(chain_uuid))
    }

    async fn list_chains(&self) -> BackendResult<Vec<InterviewChain>> {
        let store = self.store.read();
        Ok(store
            .order
            .iter()
            .filter_map(|id| store.chains.get(id).cloned())
            .collect())
    }
}
