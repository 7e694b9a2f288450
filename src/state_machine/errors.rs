use thiserror::Error;
use uuid::Uuid;

/// Comprehensive error types for state machine operations
#[derive(Error, Debug)]
pub enum StateMachineError {
    #[error("Guard condition failed: {0}")]
    GuardFailed(#[from] GuardError),

    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Action execution failed: {reason}")]
    ActionFailed { reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Specific error type for guard condition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("Interview {interview_uuid} is not the tip of chain {chain_uuid}")]
    NotTip {
        chain_uuid: Uuid,
        interview_uuid: Uuid,
    },

    #[error("Chain {chain_uuid} is already {status}")]
    ChainTerminal { chain_uuid: Uuid, status: String },

    #[error("Interview {interview_uuid} not found in chain {chain_uuid}")]
    InterviewNotFound {
        chain_uuid: Uuid,
        interview_uuid: Uuid,
    },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },

    #[error("Invalid state for guard check: {state}")]
    InvalidState { state: String },
}

/// Specific error type for action execution failures
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Event publishing failed: {event_name}")]
    EventPublishFailed { event_name: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ActionError> for StateMachineError {
    fn from(err: ActionError) -> Self {
        Self::ActionFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;
pub type GuardResult<T> = Result<T, GuardError>;
pub type ActionResult<T> = Result<T, ActionError>;

/// Helper function to create internal errors
pub fn internal_error(msg: impl Into<String>) -> StateMachineError {
    StateMachineError::Internal(msg.into())
}

/// Helper function to create business rule violations
pub fn business_rule_violation(rule: impl Into<String>) -> GuardError {
    GuardError::BusinessRuleViolation { rule: rule.into() }
}
