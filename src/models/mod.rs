//! # Chain and Interview Models
//!
//! Entity definitions for interview chains and the draft/validated values
//! the wizards produce.

pub mod chain;
pub mod draft;
pub mod interview;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export core models for easy access
pub use chain::{ChainStatus, ChainSummary, InterviewChain, InvariantViolation};
pub use draft::{
    AssignmentStep, ContactStep, InterviewDraft, InterviewPatch, NewChain, NewInterview,
    NotesStep, ScheduleStep,
};
pub use interview::{
    Interview, InterviewMethod, InterviewOutcome, InterviewStatus, InterviewType,
    JobBoardReference, RejectionReason,
};
