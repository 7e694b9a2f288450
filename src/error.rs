use thiserror::Error;
use uuid::Uuid;

use crate::backend::BackendError;
use crate::config::ConfigurationError;
use crate::orchestration::in_flight::SubmissionKind;
use crate::state_machine::errors::StateMachineError;
use crate::validation::FieldErrors;

/// Errors surfaced by the session chain manager
#[derive(Debug, Error)]
pub enum ChainError {
    /// A form failed validation; no backend call was made
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Another submission is still being committed for this chain
    #[error("Cannot {action} while a {held_by} submission is in flight for chain {chain_uuid:?}")]
    SubmissionInFlight {
        action: SubmissionKind,
        held_by: SubmissionKind,
        chain_uuid: Option<Uuid>,
    },

    #[error("Chain {0} not found")]
    ChainNotFound(Uuid),

    #[error("Interview {interview_uuid} not found in chain {chain_uuid}")]
    InterviewNotFound {
        chain_uuid: Uuid,
        interview_uuid: Uuid,
    },

    #[error("No successor is pending for chain {0}")]
    NoPendingIntent(Uuid),

    /// The chain moved on after the intent was recorded; nothing was sent
    #[error("Pending successor for chain {chain_uuid} no longer targets its tip")]
    StaleIntent { chain_uuid: Uuid },

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),

    #[error("Backend call failed: {0}")]
    Backend(#[from] BackendError),

    /// Successor creation failed; the predecessor was left untouched
    #[error("Could not create the next interview for chain {chain_uuid}: {source}")]
    SuccessorCreationFailed {
        chain_uuid: Uuid,
        #[source]
        source: BackendError,
    },

    /// The successor exists but the predecessor's outcome was not recorded
    #[error(
        "Interview {successor_interview_uuid} was created but finalizing {predecessor_interview_uuid} \
         in chain {chain_uuid} failed: {source}"
    )]
    DeferredFinalizeFailed {
        chain_uuid: Uuid,
        predecessor_interview_uuid: Uuid,
        successor_interview_uuid: Uuid,
        #[source]
        source: BackendError,
    },

    #[error("Chain {0} has no unreconciled finalize")]
    NothingToReconcile(Uuid),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ChainError {
    /// Whether a host should show this error to the user.
    ///
    /// Duplicate submissions are dropped silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::SubmissionInFlight { .. })
    }

    /// Per-field flags when this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ChainError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
