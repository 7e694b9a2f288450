//! # Interview Drafts
//!
//! In-progress form state for the interview wizards, tagged by the step that
//! collects each group of fields, and the validated immutable values a draft
//! turns into at submission time. Drafts never reach the backend directly.

use super::interview::{
    Interview, InterviewMethod, InterviewOutcome, InterviewStatus, InterviewType,
    JobBoardReference, RejectionReason,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Step 1: who the chain is for. Read-only once the chain exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStep {
    pub recruiter: Option<String>,
    pub client: Option<String>,
    pub position: Option<String>,
}

/// Step 2: when and how the interview happens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub interview_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub interview_type: Option<InterviewType>,
    pub interview_method: Option<InterviewMethod>,
    pub interview_status: Option<InterviewStatus>,
}

/// Step 3: end-client contact and sourcing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactStep {
    pub end_client_name: Option<String>,
    pub end_client_recruiter_name: Option<String>,
    pub end_client_recruiter_email: Option<String>,
    pub end_client_recruiter_phone: Option<String>,
    pub job_board_name: Option<String>,
    pub job_board_url: Option<String>,
}

/// Step 4: free text, plus the outcome fields only the edit flow exposes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesStep {
    pub comments: Option<String>,
    pub interview_feedback: Option<String>,
    pub interview_outcome: Option<InterviewOutcome>,
    pub rejection_reason: Option<RejectionReason>,
}

/// Everything the wizard has collected so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDraft {
    pub assignment: AssignmentStep,
    pub schedule: ScheduleStep,
    pub contact: ContactStep,
    pub notes: NotesStep,
}

impl InterviewDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill an edit form from an existing interview
    pub fn from_interview(interview: &Interview) -> Self {
        Self {
            assignment: AssignmentStep::default(),
            schedule: ScheduleStep {
                interview_date: Some(interview.interview_date),
                start_time: Some(interview.start_time),
                end_time: Some(interview.end_time),
                interview_type: Some(interview.interview_type),
                interview_method: Some(interview.interview_method),
                interview_status: Some(interview.interview_status),
            },
            contact: ContactStep {
                end_client_name: Some(interview.end_client_name.clone()),
                end_client_recruiter_name: Some(interview.end_client_recruiter_name.clone()),
                end_client_recruiter_email: Some(interview.end_client_recruiter_email.clone()),
                end_client_recruiter_phone: interview.end_client_recruiter_phone.clone(),
                job_board_name: interview.job_board.as_ref().map(|j| j.name.clone()),
                job_board_url: interview.job_board.as_ref().map(|j| j.url.clone()),
            },
            notes: NotesStep {
                comments: interview.comments.clone(),
                interview_feedback: interview.interview_feedback.clone(),
                interview_outcome: interview.interview_outcome,
                rejection_reason: interview.rejection_reason,
            },
        }
    }

    /// Seed the contact step, keeping anything the user already typed
    pub fn prefill_contact(&mut self, contact: &ContactStep) {
        let target = &mut self.contact;
        fill(&mut target.end_client_name, &contact.end_client_name);
        fill(
            &mut target.end_client_recruiter_name,
            &contact.end_client_recruiter_name,
        );
        fill(
            &mut target.end_client_recruiter_email,
            &contact.end_client_recruiter_email,
        );
        fill(
            &mut target.end_client_recruiter_phone,
            &contact.end_client_recruiter_phone,
        );
    }
}

fn fill(slot: &mut Option<String>, value: &Option<String>) {
    if slot.as_deref().map_or(true, |s| s.trim().is_empty()) {
        slot.clone_from(value);
    }
}

/// A validated interview ready to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInterview {
    pub interview_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interview_type: InterviewType,
    pub interview_method: InterviewMethod,
    pub interview_status: InterviewStatus,
    pub end_client_name: String,
    pub end_client_recruiter_name: String,
    pub end_client_recruiter_email: String,
    pub end_client_recruiter_phone: Option<String>,
    pub comments: Option<String>,
    pub interview_feedback: Option<String>,
    pub job_board: Option<JobBoardReference>,
    pub is_reschedule: bool,
}

/// A validated chain with its first interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChain {
    pub recruiter: String,
    pub client: String,
    pub position: String,
    pub first_interview: NewInterview,
}

/// Replacement values for the editable fields of an interview.
///
/// Chain membership and the parent pointer are never part of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPatch {
    pub interview_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interview_type: InterviewType,
    pub interview_method: InterviewMethod,
    pub interview_status: InterviewStatus,
    pub interview_outcome: Option<InterviewOutcome>,
    pub rejection_reason: Option<RejectionReason>,
    pub end_client_name: String,
    pub end_client_recruiter_name: String,
    pub end_client_recruiter_email: String,
    pub end_client_recruiter_phone: Option<String>,
    pub comments: Option<String>,
    pub interview_feedback: Option<String>,
    pub job_board: Option<JobBoardReference>,
}
