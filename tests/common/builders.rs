//! Draft builders for the wizard flows.

use chrono::{NaiveDate, NaiveTime, Utc};
use interview_chain::models::{
    Interview, InterviewChain, InterviewDraft, InterviewMethod, InterviewOutcome,
    InterviewStatus, InterviewType, RejectionReason,
};
use uuid::Uuid;

/// Builder pattern for wizard drafts
pub struct DraftBuilder {
    draft: InterviewDraft,
}

impl DraftBuilder {
    /// A complete creation draft: recruiter R, client C, "Backend Engineer"
    pub fn new_chain() -> Self {
        let mut draft = InterviewDraft::new();
        draft.assignment.recruiter = Some("R".to_string());
        draft.assignment.client = Some("C".to_string());
        draft.assignment.position = Some("Backend Engineer".to_string());
        draft.contact.job_board_name = Some("LinkedIn".to_string());
        draft.contact.job_board_url = Some("https://www.linkedin.com/jobs/view/1".to_string());
        Self { draft }.scheduled(2026, 3, 2).with_contact()
    }

    /// A successor draft with schedule only; contact comes from the intent prefill
    pub fn successor() -> Self {
        Self {
            draft: InterviewDraft::new(),
        }
        .scheduled(2026, 3, 9)
    }

    /// A direct-append draft with its own contact fields
    pub fn next_round() -> Self {
        Self::successor().with_contact()
    }

    pub fn scheduled(mut self, year: i32, month: u32, day: u32) -> Self {
        let schedule = &mut self.draft.schedule;
        schedule.interview_date = NaiveDate::from_ymd_opt(year, month, day);
        schedule.start_time = NaiveTime::from_hms_opt(10, 0, 0);
        schedule.end_time = NaiveTime::from_hms_opt(11, 0, 0);
        schedule.interview_type = Some(InterviewType::Technical);
        schedule.interview_method = Some(InterviewMethod::Video);
        self
    }

    pub fn with_contact(mut self) -> Self {
        let contact = &mut self.draft.contact;
        contact.end_client_name = Some("Initech".to_string());
        contact.end_client_recruiter_name = Some("Bill Lumbergh".to_string());
        contact.end_client_recruiter_email = Some("bill@initech.com".to_string());
        contact.end_client_recruiter_phone = Some("555-0100".to_string());
        self
    }

    pub fn end_client(mut self, name: &str) -> Self {
        self.draft.contact.end_client_name = Some(name.to_string());
        self
    }

    pub fn without_type(mut self) -> Self {
        self.draft.schedule.interview_type = None;
        self
    }

    pub fn outcome(mut self, outcome: InterviewOutcome) -> Self {
        self.draft.notes.interview_outcome = Some(outcome);
        self
    }

    pub fn rejection_reason(mut self, reason: RejectionReason) -> Self {
        self.draft.notes.rejection_reason = Some(reason);
        self
    }

    pub fn comments(mut self, comments: &str) -> Self {
        self.draft.notes.comments = Some(comments.to_string());
        self
    }

    pub fn build(self) -> InterviewDraft {
        self.draft
    }
}

/// A well-linked chain whose interviews carry `outcomes`, earliest first
pub fn chain_from_outcomes(outcomes: &[Option<InterviewOutcome>]) -> InterviewChain {
    let chain_uuid = Uuid::new_v4();
    let mut interviews: Vec<Interview> = Vec::new();
    for (round, outcome) in outcomes.iter().enumerate() {
        let now = Utc::now();
        interviews.push(Interview {
            interview_uuid: Uuid::new_v4(),
            chain_uuid,
            parent_interview_uuid: interviews.last().map(|i| i.interview_uuid),
            end_client_name: "Initech".to_string(),
            end_client_recruiter_name: "Bill Lumbergh".to_string(),
            end_client_recruiter_email: "bill@initech.com".to_string(),
            end_client_recruiter_phone: None,
            interview_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
                + chrono::Days::new(7 * round as u64),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            interview_method: InterviewMethod::Video,
            interview_type: InterviewType::Technical,
            interview_status: InterviewStatus::Scheduled,
            interview_outcome: *outcome,
            rejection_reason: None,
            is_reschedule: false,
            comments: None,
            interview_feedback: None,
            job_board: None,
            created_by: None,
            created_at: now,
            updated_by: None,
            updated_at: now,
        });
    }
    InterviewChain {
        chain_uuid,
        end_client_name: "Initech".to_string(),
        client: "C".to_string(),
        recruiter: "R".to_string(),
        position: "Backend Engineer".to_string(),
        interviews,
    }
}
