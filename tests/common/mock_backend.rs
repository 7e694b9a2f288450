//! Recording, failure-injecting chain backend for tests.
//!
//! Wraps the in-memory backend, records every call in order, and can be told
//! to fail a given operation until the failure is cleared.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use interview_chain::backend::{BackendError, BackendResult, ChainBackend, InMemoryChainBackend};
use interview_chain::models::{
    InterviewChain, InterviewOutcome, InterviewPatch, NewChain, NewInterview,
};
use interview_chain::state_machine::OutcomeFinalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateChain,
    AddInterview,
    EditInterview,
    FinalizeOutcome,
    FetchChain,
    ListChains,
}

/// One observed backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateChain {
        position: String,
    },
    AddInterview {
        chain_uuid: Uuid,
        is_reschedule: bool,
    },
    EditInterview {
        interview_uuid: Uuid,
        outcome: Option<InterviewOutcome>,
    },
    FinalizeOutcome {
        interview_uuid: Uuid,
        outcome: InterviewOutcome,
    },
    FetchChain {
        chain_uuid: Uuid,
    },
    ListChains,
}

impl BackendCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::FetchChain { .. } | Self::ListChains)
    }
}

#[derive(Debug, Default)]
struct MockBackendState {
    calls: Vec<BackendCall>,
    failures: HashMap<Operation, BackendError>,
}

/// Mock backend implementation for testing
#[derive(Clone)]
pub struct MockChainBackend {
    inner: Arc<InMemoryChainBackend>,
    state: Arc<Mutex<MockBackendState>>,
    /// Simulated round-trip time for mutating calls
    latency: Option<Duration>,
}

impl MockChainBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InMemoryChainBackend::with_actor("test-recruiter")),
            state: Arc::new(Mutex::new(MockBackendState::default())),
            latency: None,
        }
    }

    /// Set latency for simulating slow network round trips
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every call of `operation` fail with `error` until cleared
    pub fn fail(&self, operation: Operation, error: BackendError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.state.lock().unwrap().failures.remove(&operation);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<BackendCall> {
        self.calls().into_iter().filter(BackendCall::is_mutation).collect()
    }

    pub fn finalize_calls(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, BackendCall::FinalizeOutcome { .. }))
            .collect()
    }

    pub fn reset_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Read the stored chain without recording a call
    pub async fn stored_chain(&self, chain_uuid: Uuid) -> InterviewChain {
        self.inner
            .fetch_chain(chain_uuid)
            .await
            .expect("chain should be stored")
    }

    async fn enter(&self, operation: Operation, call: BackendCall) -> BackendResult<()> {
        let failure = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call.clone());
            state.failures.get(&operation).cloned()
        };
        if call.is_mutation() {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub fn network_error() -> BackendError {
    BackendError::Unavailable {
        reason: "simulated network error".to_string(),
    }
}

#[async_trait]
impl ChainBackend for MockChainBackend {
    async fn create_chain(&self, chain: &NewChain) -> BackendResult<Uuid> {
        self.enter(
            Operation::CreateChain,
            BackendCall::CreateChain {
                position: chain.position.clone(),
            },
        )
        .await?;
        self.inner.create_chain(chain).await
    }

    async fn add_interview(&self, chain_uuid: Uuid, interview: &NewInterview) -> BackendResult<Uuid> {
        self.enter(
            Operation::AddInterview,
            BackendCall::AddInterview {
                chain_uuid,
                is_reschedule: interview.is_reschedule,
            },
        )
        .await?;
        self.inner.add_interview(chain_uuid, interview).await
    }

    async fn edit_interview(&self, interview_uuid: Uuid, patch: &InterviewPatch) -> BackendResult<()> {
        self.enter(
            Operation::EditInterview,
            BackendCall::EditInterview {
                interview_uuid,
                outcome: patch.interview_outcome,
            },
        )
        .await?;
        self.inner.edit_interview(interview_uuid, patch).await
    }

    async fn finalize_outcome(
        &self,
        interview_uuid: Uuid,
        finalization: &OutcomeFinalization,
    ) -> BackendResult<()> {
        self.enter(
            Operation::FinalizeOutcome,
            BackendCall::FinalizeOutcome {
                interview_uuid,
                outcome: finalization.outcome,
            },
        )
        .await?;
        self.inner.finalize_outcome(interview_uuid, finalization).await
    }

    async fn fetch_chain(&self, chain_uuid: Uuid) -> BackendResult<InterviewChain> {
        self.enter(Operation::FetchChain, BackendCall::FetchChain { chain_uuid })
            .await?;
        self.inner.fetch_chain(chain_uuid).await
    }

    async fn list_chains(&self) -> BackendResult<Vec<InterviewChain>> {
        self.enter(Operation::ListChains, BackendCall::ListChains).await?;
        self.inner.list_chains().await
    }
}
