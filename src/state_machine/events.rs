use crate::models::{InterviewOutcome, InterviewStatus, RejectionReason};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome a user picks in the "End Interview" dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeChoice {
    Offer,
    Rejected,
    #[serde(rename = "Pending Update")]
    PendingUpdate,
    Next,
    Rescheduled,
}

impl OutcomeChoice {
    /// Choices whose finalization waits for a successor interview
    pub fn deferred_kind(&self) -> Option<DeferredKind> {
        match self {
            Self::Next => Some(DeferredKind::Next),
            Self::Rescheduled => Some(DeferredKind::Rescheduled),
            _ => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred_kind().is_some()
    }
}

impl fmt::Display for OutcomeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offer => write!(f, "Offer"),
            Self::Rejected => write!(f, "Rejected"),
            Self::PendingUpdate => write!(f, "Pending Update"),
            Self::Next => write!(f, "Next"),
            Self::Rescheduled => write!(f, "Rescheduled"),
        }
    }
}

/// The two transitions that need a new interview before they commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeferredKind {
    Next,
    Rescheduled,
}

impl DeferredKind {
    /// What gets recorded on the predecessor once the successor exists
    pub fn finalization(&self) -> OutcomeFinalization {
        match self {
            Self::Next => OutcomeFinalization {
                outcome: InterviewOutcome::Next,
                interview_status: Some(InterviewStatus::Completed),
                note: FinalizationNote::None,
            },
            Self::Rescheduled => OutcomeFinalization {
                outcome: InterviewOutcome::NoDecision,
                interview_status: Some(InterviewStatus::Rescheduled),
                note: FinalizationNote::None,
            },
        }
    }

    /// Successors created by a reschedule are tagged as such
    pub fn is_reschedule(&self) -> bool {
        matches!(self, Self::Rescheduled)
    }
}

impl fmt::Display for DeferredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "Next"),
            Self::Rescheduled => write!(f, "Rescheduled"),
        }
    }
}

/// A validated outcome selection, carrying the note its choice requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EndOutcome {
    Offer { comment: String },
    Rejected { reason: RejectionReason },
    PendingUpdate { comment: String },
    Next,
    Rescheduled,
}

impl EndOutcome {
    pub fn choice(&self) -> OutcomeChoice {
        match self {
            Self::Offer { .. } => OutcomeChoice::Offer,
            Self::Rejected { .. } => OutcomeChoice::Rejected,
            Self::PendingUpdate { .. } => OutcomeChoice::PendingUpdate,
            Self::Next => OutcomeChoice::Next,
            Self::Rescheduled => OutcomeChoice::Rescheduled,
        }
    }

    pub fn deferred_kind(&self) -> Option<DeferredKind> {
        self.choice().deferred_kind()
    }

    /// The finalize payload for outcomes that commit immediately
    pub fn immediate_finalization(&self) -> Option<OutcomeFinalization> {
        match self {
            Self::Offer { comment } => Some(OutcomeFinalization {
                outcome: InterviewOutcome::Offer,
                interview_status: Some(InterviewStatus::Completed),
                note: FinalizationNote::Comment(comment.clone()),
            }),
            Self::Rejected { reason } => Some(OutcomeFinalization {
                outcome: InterviewOutcome::Rejected,
                interview_status: Some(InterviewStatus::Completed),
                note: FinalizationNote::Reason(*reason),
            }),
            Self::PendingUpdate { comment } => Some(OutcomeFinalization {
                outcome: InterviewOutcome::PendingUpdate,
                interview_status: None,
                note: FinalizationNote::Comment(comment.clone()),
            }),
            Self::Next | Self::Rescheduled => None,
        }
    }
}

/// The note stored alongside a finalized outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FinalizationNote {
    None,
    Comment(String),
    Reason(RejectionReason),
}

/// Payload of the finalize call against one interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeFinalization {
    pub outcome: InterviewOutcome,
    /// New scheduling status; `None` leaves it unchanged
    pub interview_status: Option<InterviewStatus>,
    pub note: FinalizationNote,
}

/// Events that can trigger chain state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ChainEvent {
    /// The chain was created with its first interview
    Created,
    /// The user ended the tip interview with an outcome
    EndInterview(EndOutcome),
    /// The successor of a deferred transition was created and the
    /// predecessor finalized
    SuccessorCreated(DeferredKind),
    /// The add-interview dialog of a deferred transition was closed
    SuccessorAbandoned,
    /// An interview was appended outside a deferred transition
    InterviewAdded,
    /// The tip interview's fields were edited; carries its new outcome
    InterviewEdited(Option<InterviewOutcome>),
}

impl ChainEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::EndInterview(_) => "end_interview",
            Self::SuccessorCreated(_) => "successor_created",
            Self::SuccessorAbandoned => "successor_abandoned",
            Self::InterviewAdded => "interview_added",
            Self::InterviewEdited(_) => "interview_edited",
        }
    }

    /// The outcome choice carried by an end-interview event
    pub fn outcome_choice(&self) -> Option<OutcomeChoice> {
        match self {
            Self::EndInterview(outcome) => Some(outcome.choice()),
            _ => None,
        }
    }
}
