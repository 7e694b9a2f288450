//! # Interview Model
//!
//! A single scheduled or completed interview event inside a chain, together
//! with the labeled enumerations it carries.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares an enum whose wire and display form is a human label.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human label used on the wire and in the UI
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!(concat!("Invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

labeled_enum! {
    /// Scheduling lifecycle of an individual interview
    InterviewStatus {
        Scheduled => "Scheduled",
        PendingConfirmation => "Pending Confirmation",
        Rescheduled => "Rescheduled",
        CandidateNoShow => "Candidate No Show",
        ClientNoShow => "Client No Show",
        Postponed => "Postponed",
        Completed => "Completed",
        Cancelled => "Cancelled",
        Other => "Other",
    }
}

labeled_enum! {
    /// Result recorded on an interview that may advance or terminate its chain
    InterviewOutcome {
        /// Candidate proceeds to another round
        Next => "Next",
        Offer => "Offer",
        Rejected => "Rejected",
        PendingUpdate => "Pending Update",
        Withdrawn => "Withdrawn",
        NoDecision => "No Decision",
    }
}

labeled_enum! {
    InterviewType {
        PhoneScreen => "Phone Screen",
        Technical => "Technical",
        Behavioral => "Behavioral",
        HiringManager => "Hiring Manager",
        Panel => "Panel",
        Final => "Final",
        Other => "Other",
    }
}

labeled_enum! {
    InterviewMethod {
        Phone => "Phone",
        Video => "Video",
        InPerson => "In Person",
    }
}

labeled_enum! {
    /// Fixed list of reasons a rejection must be filed under
    RejectionReason {
        SkillsMismatch => "Skills Mismatch",
        ExperienceMismatch => "Experience Mismatch",
        CultureFit => "Culture Fit",
        CompensationMismatch => "Compensation Mismatch",
        PositionFilled => "Position Filled",
        PositionOnHold => "Position On Hold",
        CandidateUnresponsive => "Candidate Unresponsive",
        Other => "Other",
    }
}

impl Default for InterviewStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl InterviewOutcome {
    /// Outcomes that end the whole chain
    pub fn is_chain_terminal(&self) -> bool {
        matches!(self, Self::Offer | Self::Rejected)
    }

    /// Outcomes that leave the interview open for further lifecycle actions
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Next | Self::PendingUpdate)
    }
}

/// Where the opportunity was sourced from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobBoardReference {
    pub name: String,
    pub url: String,
}

/// One interview row as owned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub interview_uuid: Uuid,
    pub chain_uuid: Uuid,
    /// The interview this one succeeded, if any
    pub parent_interview_uuid: Option<Uuid>,

    pub end_client_name: String,
    pub end_client_recruiter_name: String,
    pub end_client_recruiter_email: String,
    pub end_client_recruiter_phone: Option<String>,

    pub interview_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interview_method: InterviewMethod,
    pub interview_type: InterviewType,

    pub interview_status: InterviewStatus,
    pub interview_outcome: Option<InterviewOutcome>,
    pub rejection_reason: Option<RejectionReason>,
    /// True when this interview was created by a reschedule of its parent
    pub is_reschedule: bool,

    pub comments: Option<String>,
    pub interview_feedback: Option<String>,
    pub job_board: Option<JobBoardReference>,

    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Interview {
    /// Whether this interview may remain the chain's tip without a successor
    /// decision, i.e. it carries no outcome or an open one.
    pub fn is_open(&self) -> bool {
        self.interview_outcome.map_or(true, |o| o.is_open())
    }

    /// Whether this interview closed the chain with an offer or rejection
    pub fn is_chain_terminal(&self) -> bool {
        self.interview_outcome
            .is_some_and(|o| o.is_chain_terminal())
    }
}
