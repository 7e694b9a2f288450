//! Chain builders shared by unit tests.

use super::chain::InterviewChain;
use super::interview::{
    Interview, InterviewMethod, InterviewOutcome, InterviewStatus, InterviewType,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

pub(crate) fn interview(
    chain_uuid: Uuid,
    parent: Option<Uuid>,
    outcome: Option<InterviewOutcome>,
) -> Interview {
    Interview {
        interview_uuid: Uuid::new_v4(),
        chain_uuid,
        parent_interview_uuid: parent,
        end_client_name: "Initech".to_string(),
        end_client_recruiter_name: "Bill Lumbergh".to_string(),
        end_client_recruiter_email: "bill@initech.com".to_string(),
        end_client_recruiter_phone: Some("555-0100".to_string()),
        interview_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        interview_method: InterviewMethod::Video,
        interview_type: InterviewType::Technical,
        interview_status: InterviewStatus::Scheduled,
        interview_outcome: outcome,
        rejection_reason: None,
        is_reschedule: false,
        comments: None,
        interview_feedback: None,
        job_board: None,
        created_by: None,
        created_at: Utc::now(),
        updated_by: None,
        updated_at: Utc::now(),
    }
}

/// A well-linked chain whose interviews carry `outcomes`, earliest first
pub(crate) fn chain_with(outcomes: &[Option<InterviewOutcome>]) -> InterviewChain {
    let chain_uuid = Uuid::new_v4();
    let mut interviews: Vec<Interview> = Vec::new();
    for outcome in outcomes {
        let parent = interviews.last().map(|i| i.interview_uuid);
        interviews.push(interview(chain_uuid, parent, *outcome));
    }
    InterviewChain {
        chain_uuid,
        end_client_name: "Initech".to_string(),
        client: "Acme Staffing".to_string(),
        recruiter: "Rita".to_string(),
        position: "Backend Engineer".to_string(),
        interviews,
    }
}
