use proptest::prelude::*;

use interview_chain::models::InterviewOutcome;
use interview_chain::state_machine::OutcomeChoice;

/// Strategy for any recorded outcome, or none
pub fn outcome_strategy() -> impl Strategy<Value = Option<InterviewOutcome>> {
    prop::option::of(prop::sample::select(InterviewOutcome::ALL.to_vec()))
}

/// Strategy for interview outcome lists of length 1..=12
pub fn outcome_list_strategy() -> impl Strategy<Value = Vec<Option<InterviewOutcome>>> {
    prop::collection::vec(outcome_strategy(), 1..=12)
}

/// Strategy for a sequence of End Interview choices
pub fn choice_sequence_strategy() -> impl Strategy<Value = Vec<OutcomeChoice>> {
    prop::collection::vec(
        prop::sample::select(vec![
            OutcomeChoice::Offer,
            OutcomeChoice::Rejected,
            OutcomeChoice::PendingUpdate,
            OutcomeChoice::Next,
            OutcomeChoice::Rescheduled,
        ]),
        0..10,
    )
}
