//! Step validation for the interview wizards
//!
//! Each of the four wizard steps used when creating a chain, adding an
//! interview, or editing one is gated by [`StepValidator::validate_step`].
//! Validation never fails loudly: it raises per-field flags in a
//! [`FieldErrors`] and returns whether the user may advance. Drafts only turn
//! into the validated values the backend accepts through the `build_*`
//! methods, which run every step first.

use crate::config::ValidationConfig;
use crate::models::{
    InterviewDraft, InterviewOutcome, InterviewPatch, JobBoardReference, NewChain,
    NewInterview, RejectionReason,
};
use crate::state_machine::events::{EndOutcome, OutcomeChoice};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// `local@domain.tld`, nothing stricter
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Whether a string has the simple `local@domain.tld` shape
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .is_ok_and(|re| re.is_match(value.trim()))
}

/// The four wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    /// Recruiter, client, position
    Assignment,
    /// Date, times, type, method
    Schedule,
    /// End-client contact and job board
    Contact,
    /// Notes and review; no gate except in the edit flow
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Assignment,
        WizardStep::Schedule,
        WizardStep::Contact,
        WizardStep::Review,
    ];

    /// Map the 1-based step number shown in the UI
    pub fn from_number(step: u8) -> Option<Self> {
        match step {
            1 => Some(Self::Assignment),
            2 => Some(Self::Schedule),
            3 => Some(Self::Contact),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Assignment => 1,
            Self::Schedule => 2,
            Self::Contact => 3,
            Self::Review => 4,
        }
    }
}

/// Which wizard is being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormFlow {
    /// New chain with its first interview
    CreateChain,
    /// Append an interview to an existing chain
    AddInterview,
    /// Change an existing interview's fields
    EditInterview,
}

impl FormFlow {
    /// Step 1 fields are inherited read-only from the chain outside creation
    pub fn requires_assignment(&self) -> bool {
        matches!(self, Self::CreateChain)
    }
}

/// Per-field error flags surfaced inline by the forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub recruiter: bool,
    pub client: bool,
    pub position: bool,
    pub interview_date: bool,
    pub start_time: bool,
    pub end_time: bool,
    pub interview_type: bool,
    pub interview_method: bool,
    pub end_client_name: bool,
    pub end_client_recruiter_name: bool,
    pub end_client_recruiter_email: bool,
    pub job_board_name: bool,
    pub job_board_url: bool,
    pub outcome: bool,
    pub comment: bool,
    pub rejection: bool,
}

/// A single inline message for a flagged field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMessage {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldErrors {
    fn flags(&self) -> [(bool, &'static str, &'static str); 16] {
        [
            (self.recruiter, "recruiter", "Recruiter is required"),
            (self.client, "client", "Client is required"),
            (self.position, "position", "Position is required"),
            (self.interview_date, "interview_date", "Interview date is required"),
            (self.start_time, "start_time", "Start time is required"),
            (self.end_time, "end_time", "End time is required and must be after the start time"),
            (self.interview_type, "interview_type", "Interview type is required"),
            (self.interview_method, "interview_method", "Interview method is required"),
            (self.end_client_name, "end_client_name", "End client name is required"),
            (
                self.end_client_recruiter_name,
                "end_client_recruiter_name",
                "End client recruiter name is required",
            ),
            (
                self.end_client_recruiter_email,
                "end_client_recruiter_email",
                "A valid end client recruiter email is required",
            ),
            (self.job_board_name, "job_board_name", "Job board name is required"),
            (self.job_board_url, "job_board_url", "Job board URL is required"),
            (self.outcome, "outcome", "Select an outcome"),
            (self.comment, "comment", "A comment is required for this outcome"),
            (self.rejection, "rejection_reason", "Select a rejection reason"),
        ]
    }

    /// Whether any field is flagged
    pub fn any(&self) -> bool {
        self.flags().iter().any(|(set, _, _)| *set)
    }

    /// Messages for every flagged field
    pub fn messages(&self) -> Vec<FieldMessage> {
        self.flags()
            .into_iter()
            .filter(|(set, _, _)| *set)
            .map(|(_, field, message)| FieldMessage { field, message })
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn clear_step(&mut self, step: WizardStep) {
        match step {
            WizardStep::Assignment => {
                self.recruiter = false;
                self.client = false;
                self.position = false;
            }
            WizardStep::Schedule => {
                self.interview_date = false;
                self.start_time = false;
                self.end_time = false;
                self.interview_type = false;
                self.interview_method = false;
            }
            WizardStep::Contact => {
                self.end_client_name = false;
                self.end_client_recruiter_name = false;
                self.end_client_recruiter_email = false;
                self.job_board_name = false;
                self.job_board_url = false;
            }
            WizardStep::Review => {
                self.rejection = false;
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.messages().iter().map(|m| m.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// The "End Interview" form: an outcome choice plus its required note
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeForm {
    pub choice: Option<OutcomeChoice>,
    pub comment: Option<String>,
    pub rejection_reason: Option<RejectionReason>,
}

impl OutcomeForm {
    pub fn new(choice: OutcomeChoice) -> Self {
        Self {
            choice: Some(choice),
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_reason(mut self, reason: RejectionReason) -> Self {
        self.rejection_reason = Some(reason);
        self
    }

    /// Gate the form; a comment is mandatory for Offer and Pending Update and
    /// a reason for Rejected. Next and Rescheduled need nothing here.
    pub fn validate(&self, errors: &mut FieldErrors) -> bool {
        errors.outcome = false;
        errors.comment = false;
        errors.rejection = false;

        match self.choice {
            None => errors.outcome = true,
            Some(OutcomeChoice::Offer) | Some(OutcomeChoice::PendingUpdate) => {
                errors.comment = present(&self.comment).is_none();
            }
            Some(OutcomeChoice::Rejected) => {
                errors.rejection = self.rejection_reason.is_none();
            }
            Some(OutcomeChoice::Next) | Some(OutcomeChoice::Rescheduled) => {}
        }

        !(errors.outcome || errors.comment || errors.rejection)
    }

    /// Turn a valid form into the outcome the transition engine consumes
    pub fn build(&self) -> Result<EndOutcome, FieldErrors> {
        let mut errors = FieldErrors::default();
        if !self.validate(&mut errors) {
            return Err(errors);
        }

        let outcome = match (self.choice, present(&self.comment), self.rejection_reason) {
            (Some(OutcomeChoice::Offer), Some(comment), _) => EndOutcome::Offer { comment },
            (Some(OutcomeChoice::PendingUpdate), Some(comment), _) => {
                EndOutcome::PendingUpdate { comment }
            }
            (Some(OutcomeChoice::Rejected), _, Some(reason)) => EndOutcome::Rejected { reason },
            (Some(OutcomeChoice::Next), _, _) => EndOutcome::Next,
            (Some(OutcomeChoice::Rescheduled), _, _) => EndOutcome::Rescheduled,
            _ => {
                errors.outcome = true;
                return Err(errors);
            }
        };
        Ok(outcome)
    }
}

/// Gatekeeper for one wizard flow
#[derive(Debug, Clone)]
pub struct StepValidator {
    flow: FormFlow,
    rules: ValidationConfig,
}

impl StepValidator {
    pub fn new(flow: FormFlow, rules: ValidationConfig) -> Self {
        Self { flow, rules }
    }

    pub fn flow(&self) -> FormFlow {
        self.flow
    }

    /// Decide whether the user may leave `step`, refreshing that step's flags
    pub fn validate_step(
        &self,
        draft: &InterviewDraft,
        step: WizardStep,
        errors: &mut FieldErrors,
    ) -> bool {
        errors.clear_step(step);

        match step {
            WizardStep::Assignment => {
                if self.flow.requires_assignment() {
                    let assignment = &draft.assignment;
                    errors.recruiter = present(&assignment.recruiter).is_none();
                    errors.client = present(&assignment.client).is_none();
                    errors.position = present(&assignment.position).is_none();
                }
                !(errors.recruiter || errors.client || errors.position)
            }
            WizardStep::Schedule => {
                let schedule = &draft.schedule;
                errors.interview_date = schedule.interview_date.is_none();
                errors.start_time = schedule.start_time.is_none();
                errors.end_time = match (schedule.start_time, schedule.end_time) {
                    (_, None) => true,
                    (Some(start), Some(end)) if self.rules.enforce_time_order => end <= start,
                    _ => false,
                };
                errors.interview_type = schedule.interview_type.is_none();
                errors.interview_method = schedule.interview_method.is_none();
                !(errors.interview_date
                    || errors.start_time
                    || errors.end_time
                    || errors.interview_type
                    || errors.interview_method)
            }
            WizardStep::Contact => {
                let contact = &draft.contact;
                errors.end_client_name = present(&contact.end_client_name).is_none();
                errors.end_client_recruiter_name =
                    present(&contact.end_client_recruiter_name).is_none();
                errors.end_client_recruiter_email = !present(&contact.end_client_recruiter_email)
                    .is_some_and(|email| is_valid_email(&email));

                let name = present(&contact.job_board_name);
                let url = present(&contact.job_board_url);
                let required = self.flow == FormFlow::CreateChain
                    && self.rules.require_job_board_for_new_chain;
                // Either both halves of the reference or none of it
                let partial = name.is_some() != url.is_some();
                errors.job_board_name = name.is_none() && (required || partial);
                errors.job_board_url = url.is_none() && (required || partial);

                !(errors.end_client_name
                    || errors.end_client_recruiter_name
                    || errors.end_client_recruiter_email
                    || errors.job_board_name
                    || errors.job_board_url)
            }
            WizardStep::Review => {
                if self.flow == FormFlow::EditInterview {
                    let notes = &draft.notes;
                    errors.rejection = notes.interview_outcome == Some(InterviewOutcome::Rejected)
                        && notes.rejection_reason.is_none();
                }
                !errors.rejection
            }
        }
    }

    /// Run every step; the submit button is only enabled when this passes
    pub fn validate_all(&self, draft: &InterviewDraft, errors: &mut FieldErrors) -> bool {
        WizardStep::ALL
            .iter()
            .fold(true, |ok, step| self.validate_step(draft, *step, errors) && ok)
    }

    fn checked(&self, draft: &InterviewDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.validate_all(draft, &mut errors) {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validated new interview from a draft
    pub fn build_new_interview(&self, draft: &InterviewDraft) -> Result<NewInterview, FieldErrors> {
        self.checked(draft)?;
        let parts = Parts::extract(draft)?;
        Ok(NewInterview {
            interview_date: parts.interview_date,
            start_time: parts.start_time,
            end_time: parts.end_time,
            interview_type: parts.interview_type,
            interview_method: parts.interview_method,
            interview_status: draft.schedule.interview_status.unwrap_or_default(),
            end_client_name: parts.end_client_name,
            end_client_recruiter_name: parts.end_client_recruiter_name,
            end_client_recruiter_email: parts.end_client_recruiter_email,
            end_client_recruiter_phone: present(&draft.contact.end_client_recruiter_phone),
            comments: present(&draft.notes.comments),
            interview_feedback: present(&draft.notes.interview_feedback),
            job_board: parts.job_board,
            is_reschedule: false,
        })
    }

    /// Validated new chain from a creation draft
    pub fn build_new_chain(&self, draft: &InterviewDraft) -> Result<NewChain, FieldErrors> {
        let first_interview = self.build_new_interview(draft)?;
        let assignment = &draft.assignment;
        match (
            present(&assignment.recruiter),
            present(&assignment.client),
            present(&assignment.position),
        ) {
            (Some(recruiter), Some(client), Some(position)) => Ok(NewChain {
                recruiter,
                client,
                position,
                first_interview,
            }),
            _ => Err(FieldErrors {
                recruiter: present(&assignment.recruiter).is_none(),
                client: present(&assignment.client).is_none(),
                position: present(&assignment.position).is_none(),
                ..FieldErrors::default()
            }),
        }
    }

    /// Validated replacement values from an edit draft
    pub fn build_patch(&self, draft: &InterviewDraft) -> Result<InterviewPatch, FieldErrors> {
        self.checked(draft)?;
        let parts = Parts::extract(draft)?;
        let outcome = draft.notes.interview_outcome;
        Ok(InterviewPatch {
            interview_date: parts.interview_date,
            start_time: parts.start_time,
            end_time: parts.end_time,
            interview_type: parts.interview_type,
            interview_method: parts.interview_method,
            interview_status: draft.schedule.interview_status.unwrap_or_default(),
            interview_outcome: outcome,
            rejection_reason: draft
                .notes
                .rejection_reason
                .filter(|_| outcome == Some(InterviewOutcome::Rejected)),
            end_client_name: parts.end_client_name,
            end_client_recruiter_name: parts.end_client_recruiter_name,
            end_client_recruiter_email: parts.end_client_recruiter_email,
            end_client_recruiter_phone: present(&draft.contact.end_client_recruiter_phone),
            comments: present(&draft.notes.comments),
            interview_feedback: present(&draft.notes.interview_feedback),
            job_board: parts.job_board,
        })
    }
}

/// Required fields pulled out of a draft that already passed validation
struct Parts {
    interview_date: chrono::NaiveDate,
    start_time: chrono::NaiveTime,
    end_time: chrono::NaiveTime,
    interview_type: crate::models::InterviewType,
    interview_method: crate::models::InterviewMethod,
    end_client_name: String,
    end_client_recruiter_name: String,
    end_client_recruiter_email: String,
    job_board: Option<JobBoardReference>,
}

impl Parts {
    fn extract(draft: &InterviewDraft) -> Result<Self, FieldErrors> {
        let schedule = &draft.schedule;
        let contact = &draft.contact;
        let job_board = match (present(&contact.job_board_name), present(&contact.job_board_url)) {
            (Some(name), Some(url)) => Some(JobBoardReference { name, url }),
            _ => None,
        };

        match (
            schedule.interview_date,
            schedule.start_time,
            schedule.end_time,
            schedule.interview_type,
            schedule.interview_method,
            present(&contact.end_client_name),
            present(&contact.end_client_recruiter_name),
            present(&contact.end_client_recruiter_email),
        ) {
            (
                Some(interview_date),
                Some(start_time),
                Some(end_time),
                Some(interview_type),
                Some(interview_method),
                Some(end_client_name),
                Some(end_client_recruiter_name),
                Some(end_client_recruiter_email),
            ) => Ok(Self {
                interview_date,
                start_time,
                end_time,
                interview_type,
                interview_method,
                end_client_name,
                end_client_recruiter_name,
                end_client_recruiter_email,
                job_board,
            }),
            _ => {
                let mut errors = FieldErrors::default();
                errors.interview_date = schedule.interview_date.is_none();
                errors.start_time = schedule.start_time.is_none();
                errors.end_time = schedule.end_time.is_none();
                errors.interview_type = schedule.interview_type.is_none();
                errors.interview_method = schedule.interview_method.is_none();
                errors.end_client_name = present(&contact.end_client_name).is_none();
                errors.end_client_recruiter_name =
                    present(&contact.end_client_recruiter_name).is_none();
                errors.end_client_recruiter_email =
                    present(&contact.end_client_recruiter_email).is_none();
                Err(errors)
            }
        }
    }
}

/// Trimmed, non-empty value of an optional text field
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterviewMethod, InterviewType};
    use chrono::{NaiveDate, NaiveTime};

    fn rules() -> ValidationConfig {
        ValidationConfig::default()
    }

    fn complete_draft() -> InterviewDraft {
        let mut draft = InterviewDraft::new();
        draft.assignment.recruiter = Some("Rita".to_string());
        draft.assignment.client = Some("Acme Staffing".to_string());
        draft.assignment.position = Some("Backend Engineer".to_string());
        draft.schedule.interview_date = NaiveDate::from_ymd_opt(2026, 3, 2);
        draft.schedule.start_time = NaiveTime::from_hms_opt(10, 0, 0);
        draft.schedule.end_time = NaiveTime::from_hms_opt(11, 0, 0);
        draft.schedule.interview_type = Some(InterviewType::Technical);
        draft.schedule.interview_method = Some(InterviewMethod::Video);
        draft.contact.end_client_name = Some("Initech".to_string());
        draft.contact.end_client_recruiter_name = Some("Bill Lumbergh".to_string());
        draft.contact.end_client_recruiter_email = Some("bill@initech.com".to_string());
        draft.contact.job_board_name = Some("LinkedIn".to_string());
        draft.contact.job_board_url = Some("https://linkedin.com/jobs/1".to_string());
        draft
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("bill@initech.com"));
        assert!(is_valid_email("  a.b+c@sub.example.org "));
        assert!(!is_valid_email("bill@initech"));
        assert!(!is_valid_email("bill initech.com"));
        assert!(!is_valid_email("@initech.com"));
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
        assert!(EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN)).is_ok());
    }

    #[test]
    fn test_step_numbers() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_number(step.number()), Some(step));
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(5), None);
    }

    #[test]
    fn test_assignment_required_only_for_creation() {
        let mut draft = complete_draft();
        draft.assignment = Default::default();
        let mut errors = FieldErrors::default();

        let create = StepValidator::new(FormFlow::CreateChain, rules());
        assert!(!create.validate_step(&draft, WizardStep::Assignment, &mut errors));
        assert!(errors.recruiter && errors.client && errors.position);

        let add = StepValidator::new(FormFlow::AddInterview, rules());
        assert!(add.validate_step(&draft, WizardStep::Assignment, &mut errors));
        assert!(!errors.any());
    }

    #[test]
    fn test_missing_type_blocks_schedule_step() {
        let validator = StepValidator::new(FormFlow::AddInterview, rules());
        let mut draft = complete_draft();
        draft.schedule.interview_type = None;
        let mut errors = FieldErrors::default();

        assert!(!validator.validate_step(&draft, WizardStep::Schedule, &mut errors));
        assert!(errors.interview_type);
        assert!(!errors.interview_method);

        draft.schedule.interview_type = Some(InterviewType::Panel);
        assert!(validator.validate_step(&draft, WizardStep::Schedule, &mut errors));
        assert!(!errors.interview_type);
    }

    #[test]
    fn test_time_order() {
        let mut draft = complete_draft();
        draft.schedule.end_time = NaiveTime::from_hms_opt(9, 0, 0);
        let mut errors = FieldErrors::default();

        let strict = StepValidator::new(FormFlow::AddInterview, rules());
        assert!(!strict.validate_step(&draft, WizardStep::Schedule, &mut errors));
        assert!(errors.end_time);

        let lenient = StepValidator::new(
            FormFlow::AddInterview,
            ValidationConfig {
                enforce_time_order: false,
                ..rules()
            },
        );
        assert!(lenient.validate_step(&draft, WizardStep::Schedule, &mut errors));
    }

    #[test]
    fn test_job_board_required_for_new_chain() {
        let mut draft = complete_draft();
        draft.contact.job_board_name = None;
        draft.contact.job_board_url = None;
        let mut errors = FieldErrors::default();

        let create = StepValidator::new(FormFlow::CreateChain, rules());
        assert!(!create.validate_step(&draft, WizardStep::Contact, &mut errors));
        assert!(errors.job_board_name && errors.job_board_url);

        let edit = StepValidator::new(FormFlow::EditInterview, rules());
        assert!(edit.validate_step(&draft, WizardStep::Contact, &mut errors));

        draft.contact.job_board_url = Some("https://example.com".to_string());
        assert!(!edit.validate_step(&draft, WizardStep::Contact, &mut errors));
        assert!(errors.job_board_name);
        assert!(!errors.job_board_url);
    }

    #[test]
    fn test_malformed_email_flagged() {
        let validator = StepValidator::new(FormFlow::AddInterview, rules());
        let mut draft = complete_draft();
        draft.contact.end_client_recruiter_email = Some("not-an-email".to_string());
        let mut errors = FieldErrors::default();

        assert!(!validator.validate_step(&draft, WizardStep::Contact, &mut errors));
        assert!(errors.end_client_recruiter_email);
        assert_eq!(errors.messages()[0].field, "end_client_recruiter_email");
    }

    #[test]
    fn test_build_new_chain() {
        let validator = StepValidator::new(FormFlow::CreateChain, rules());
        let chain = validator.build_new_chain(&complete_draft()).unwrap();
        assert_eq!(chain.position, "Backend Engineer");
        assert_eq!(
            chain.first_interview.job_board.as_ref().map(|j| j.name.as_str()),
            Some("LinkedIn")
        );
        assert!(!chain.first_interview.is_reschedule);

        let errors = validator.build_new_chain(&InterviewDraft::new()).unwrap_err();
        assert!(errors.recruiter && errors.interview_date && errors.end_client_name);
    }

    #[test]
    fn test_edit_rejection_needs_reason() {
        let validator = StepValidator::new(FormFlow::EditInterview, rules());
        let mut draft = complete_draft();
        draft.notes.interview_outcome = Some(InterviewOutcome::Rejected);
        let mut errors = FieldErrors::default();
        assert!(!validator.validate_step(&draft, WizardStep::Review, &mut errors));
        assert!(errors.rejection);

        draft.notes.rejection_reason = Some(RejectionReason::PositionFilled);
        let patch = validator.build_patch(&draft).unwrap();
        assert_eq!(patch.rejection_reason, Some(RejectionReason::PositionFilled));
    }

    #[test]
    fn test_outcome_form_requirements() {
        let mut errors = FieldErrors::default();

        assert!(!OutcomeForm::default().validate(&mut errors));
        assert!(errors.outcome);

        assert!(!OutcomeForm::new(OutcomeChoice::Offer).validate(&mut errors));
        assert!(errors.comment);
        assert!(!OutcomeForm::new(OutcomeChoice::PendingUpdate)
            .with_comment("   ")
            .validate(&mut errors));
        assert!(errors.comment);

        assert!(!OutcomeForm::new(OutcomeChoice::Rejected).validate(&mut errors));
        assert!(errors.rejection);

        assert!(OutcomeForm::new(OutcomeChoice::Next).validate(&mut errors));
        assert!(!errors.any());

        let outcome = OutcomeForm::new(OutcomeChoice::Offer)
            .with_comment(" Great culture fit ")
            .build()
            .unwrap();
        assert_eq!(
            outcome,
            EndOutcome::Offer {
                comment: "Great culture fit".to_string()
            }
        );
    }
}
