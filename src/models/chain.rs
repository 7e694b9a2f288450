//! # Interview Chain Model
//!
//! The aggregate view of one candidate/position pursuit: an ordered sequence
//! of interviews, earliest first, with status and round count derived from it.

use super::interview::{Interview, InterviewOutcome, InterviewStatus, InterviewType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Derived status of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainStatus {
    Active,
    Successful,
    Unsuccessful,
}

impl ChainStatus {
    /// Status implied by the outcome of the chain's most recent interview
    pub fn from_latest_outcome(outcome: Option<InterviewOutcome>) -> Self {
        match outcome {
            Some(InterviewOutcome::Offer) => Self::Successful,
            Some(InterviewOutcome::Rejected) => Self::Unsuccessful,
            _ => Self::Active,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Successful => write!(f, "Successful"),
            Self::Unsuccessful => write!(f, "Unsuccessful"),
        }
    }
}

/// A structural problem found in a chain's interview list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The chain has no interviews at all
    Empty,
    /// An interview before the tip carries no outcome, or one that still
    /// expects a decision on that same interview
    OpenPredecessor { position: usize, interview_uuid: Uuid },
    /// The first interview points at a parent
    RootHasParent { interview_uuid: Uuid },
    /// An interview does not point at the interview right before it
    BrokenParentLink {
        position: usize,
        interview_uuid: Uuid,
        expected: Uuid,
        found: Option<Uuid>,
    },
    /// An interview is filed under a different chain
    ForeignInterview { position: usize, interview_uuid: Uuid },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "chain has no interviews"),
            Self::OpenPredecessor {
                position,
                interview_uuid,
            } => write!(
                f,
                "interview {interview_uuid} at round {} has a successor but is still open",
                position + 1
            ),
            Self::RootHasParent { interview_uuid } => {
                write!(f, "first interview {interview_uuid} has a parent")
            }
            Self::BrokenParentLink {
                position,
                interview_uuid,
                expected,
                found,
            } => write!(
                f,
                "interview {interview_uuid} at round {} points at {found:?}, expected {expected}",
                position + 1
            ),
            Self::ForeignInterview {
                position,
                interview_uuid,
            } => write!(
                f,
                "interview {interview_uuid} at round {} belongs to another chain",
                position + 1
            ),
        }
    }
}

/// One candidate's pursuit of one position with one end client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewChain {
    pub chain_uuid: Uuid,
    pub end_client_name: String,
    /// Recruiting-side client the candidate is represented for
    pub client: String,
    pub recruiter: String,
    pub position: String,
    /// Earliest to latest
    pub interviews: Vec<Interview>,
}

/// Flattened, derived view of a chain for list displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub chain_uuid: Uuid,
    pub end_client_name: String,
    pub client: String,
    pub recruiter: String,
    pub position: String,
    pub status: ChainStatus,
    pub rounds: usize,
    pub latest_interview_date: Option<NaiveDate>,
    pub latest_interview_status: Option<InterviewStatus>,
    pub latest_interview_type: Option<InterviewType>,
}

impl InterviewChain {
    /// The most recent interview, the only one eligible for lifecycle actions
    pub fn tip(&self) -> Option<&Interview> {
        self.interviews.last()
    }

    pub fn status(&self) -> ChainStatus {
        ChainStatus::from_latest_outcome(self.tip().and_then(|i| i.interview_outcome))
    }

    pub fn rounds(&self) -> usize {
        self.interviews.len()
    }

    pub fn latest_interview_date(&self) -> Option<NaiveDate> {
        self.tip().map(|i| i.interview_date)
    }

    pub fn latest_interview_status(&self) -> Option<InterviewStatus> {
        self.tip().map(|i| i.interview_status)
    }

    pub fn latest_interview_type(&self) -> Option<InterviewType> {
        self.tip().map(|i| i.interview_type)
    }

    pub fn interview(&self, interview_uuid: Uuid) -> Option<&Interview> {
        self.interviews
            .iter()
            .find(|i| i.interview_uuid == interview_uuid)
    }

    /// Zero-based position of an interview in the chain
    pub fn position_of(&self, interview_uuid: Uuid) -> Option<usize> {
        self.interviews
            .iter()
            .position(|i| i.interview_uuid == interview_uuid)
    }

    pub fn is_tip(&self, interview_uuid: Uuid) -> bool {
        self.tip()
            .is_some_and(|tip| tip.interview_uuid == interview_uuid)
    }

    pub fn summary(&self) -> ChainSummary {
        ChainSummary {
            chain_uuid: self.chain_uuid,
            end_client_name: self.end_client_name.clone(),
            client: self.client.clone(),
            recruiter: self.recruiter.clone(),
            position: self.position.clone(),
            status: self.status(),
            rounds: self.rounds(),
            latest_interview_date: self.latest_interview_date(),
            latest_interview_status: self.latest_interview_status(),
            latest_interview_type: self.latest_interview_type(),
        }
    }

    /// Check the linked-list and terminal-tip invariants in a single pass.
    ///
    /// Every interview but the first must point at its immediate predecessor,
    /// and every interview but the tip must be closed. `Next` is the one open
    /// outcome a predecessor may keep, since it names the successor.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        if self.interviews.is_empty() {
            violations.push(InvariantViolation::Empty);
            return violations;
        }

        let last = self.interviews.len() - 1;
        let mut previous: Option<&Interview> = None;

        for (position, interview) in self.interviews.iter().enumerate() {
            if interview.chain_uuid != self.chain_uuid {
                violations.push(InvariantViolation::ForeignInterview {
                    position,
                    interview_uuid: interview.interview_uuid,
                });
            }

            match previous {
                None => {
                    if interview.parent_interview_uuid.is_some() {
                        violations.push(InvariantViolation::RootHasParent {
                            interview_uuid: interview.interview_uuid,
                        });
                    }
                }
                Some(prev) => {
                    if interview.parent_interview_uuid != Some(prev.interview_uuid) {
                        violations.push(InvariantViolation::BrokenParentLink {
                            position,
                            interview_uuid: interview.interview_uuid,
                            expected: prev.interview_uuid,
                            found: interview.parent_interview_uuid,
                        });
                    }
                }
            }

            let superseded = interview.interview_outcome == Some(InterviewOutcome::Next);
            if position < last && interview.is_open() && !superseded {
                violations.push(InvariantViolation::OpenPredecessor {
                    position,
                    interview_uuid: interview.interview_uuid,
                });
            }

            previous = Some(interview);
        }

        violations
    }
}
