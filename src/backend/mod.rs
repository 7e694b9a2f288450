//! # Chain Backend
//!
//! The persistence collaborator that owns chains and interviews. The engine
//! only orchestrates calls against it; identifiers, uniqueness and storage
//! are the backend's business.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{InterviewChain, InterviewPatch, NewChain, NewInterview};
use crate::state_machine::events::OutcomeFinalization;

pub use memory::InMemoryChainBackend;

/// Failures reported by a backend call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend call timed out: {operation}")]
    Timeout { operation: String },

    #[error("Internal backend error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Whether repeating the same call later can reasonably succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
            || matches!(self, Self::Rejected { status, .. } if *status >= 500)
    }

    pub fn chain_not_found(chain_uuid: Uuid) -> Self {
        Self::NotFound {
            entity: "Chain",
            id: chain_uuid,
        }
    }

    pub fn interview_not_found(interview_uuid: Uuid) -> Self {
        Self::NotFound {
            entity: "Interview",
            id: interview_uuid,
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Calls the lifecycle engine makes against the system of record.
///
/// Each call is awaited before the next one is issued; implementations need
/// not be safe against concurrent mutation of the same chain from one session.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// Create a chain together with its first interview, returning the chain id
    async fn create_chain(&self, chain: &NewChain) -> BackendResult<Uuid>;

    /// Append an interview whose parent is the chain's current tip
    async fn add_interview(&self, chain_uuid: Uuid, interview: &NewInterview)
        -> BackendResult<Uuid>;

    /// Replace the editable fields of an interview
    async fn edit_interview(&self, interview_uuid: Uuid, patch: &InterviewPatch)
        -> BackendResult<()>;

    /// Record an outcome on an interview
    async fn finalize_outcome(
        &self,
        interview_uuid: Uuid,
        finalization: &OutcomeFinalization,
    ) -> BackendResult<()>;

    /// Re-read a chain with its full interview list
    async fn fetch_chain(&self, chain_uuid: Uuid) -> BackendResult<InterviewChain>;

    /// Every chain visible to the session, for the chain list page
    async fn list_chains(&self) -> BackendResult<Vec<InterviewChain>>;
}
