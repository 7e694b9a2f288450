//! # Chain Projection
//!
//! Timeline view model derived from a chain's interview list. The only state
//! it keeps of its own is which entry is expanded for inspection; everything
//! else is recomputed from the interviews on every refresh.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ChainStatus, Interview, InterviewChain, InterviewOutcome, InterviewStatus, InterviewType,
};

/// Lifecycle actions an interview exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableActions {
    pub edit: bool,
    pub end_interview: bool,
}

impl AvailableActions {
    /// Actions for one interview: only the tip, and only while its outcome is
    /// not an offer or rejection
    pub fn for_interview(interview: &Interview, is_tip: bool) -> Self {
        let open = is_tip && !interview.is_chain_terminal();
        Self {
            edit: open,
            end_interview: open,
        }
    }

    pub fn any(&self) -> bool {
        self.edit || self.end_interview
    }
}

/// One row of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// 1-based round number
    pub ordinal: usize,
    pub interview_uuid: Uuid,
    pub interview_date: NaiveDate,
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub outcome: Option<InterviewOutcome>,
    pub is_reschedule: bool,
    pub is_tip: bool,
    pub actions: AvailableActions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProjection {
    pub chain_uuid: Uuid,
    pub status: ChainStatus,
    pub entries: Vec<TimelineEntry>,
    /// A round may be appended without going through End Interview
    pub can_add_interview: bool,
    expanded: Option<usize>,
}

impl ChainProjection {
    /// Derive the timeline, expanding the most recent entry
    pub fn from_chain(chain: &InterviewChain) -> Self {
        let last = chain.interviews.len().checked_sub(1);
        let entries: Vec<TimelineEntry> = chain
            .interviews
            .iter()
            .enumerate()
            .map(|(index, interview)| {
                let is_tip = Some(index) == last;
                TimelineEntry {
                    ordinal: index + 1,
                    interview_uuid: interview.interview_uuid,
                    interview_date: interview.interview_date,
                    interview_type: interview.interview_type,
                    status: interview.interview_status,
                    outcome: interview.interview_outcome,
                    is_reschedule: interview.is_reschedule,
                    is_tip,
                    actions: AvailableActions::for_interview(interview, is_tip),
                }
            })
            .collect();

        let status = chain.status();
        let can_add_interview =
            !status.is_terminal() && chain.tip().is_some_and(|tip| !tip.is_open());

        Self {
            chain_uuid: chain.chain_uuid,
            status,
            entries,
            can_add_interview,
            expanded: last,
        }
    }

    pub fn rounds(&self) -> usize {
        self.entries.len()
    }

    pub fn tip_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    pub fn tip(&self) -> Option<&TimelineEntry> {
        self.entries.last()
    }

    pub fn expanded(&self) -> Option<&TimelineEntry> {
        self.expanded.and_then(|index| self.entries.get(index))
    }

    /// Expand the entry for an interview; false when it is not in the chain
    pub fn expand(&mut self, interview_uuid: Uuid) -> bool {
        match self.index_of(interview_uuid) {
            Some(index) => {
                self.expanded = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn actions_for(&self, interview_uuid: Uuid) -> AvailableActions {
        self.index_of(interview_uuid)
            .map(|index| self.entries[index].actions)
            .unwrap_or_default()
    }

    /// Re-derive from a refreshed chain. The expanded entry survives if its
    /// interview is still there; a new round moves the selection to the tip.
    pub fn refresh(&mut self, chain: &InterviewChain) {
        let previous_rounds = self.rounds();
        let previous = self.expanded().map(|entry| entry.interview_uuid);
        let collapsed = self.expanded.is_none();

        *self = Self::from_chain(chain);

        if self.rounds() > previous_rounds {
            return;
        }
        if collapsed {
            self.expanded = None;
        } else if let Some(interview_uuid) = previous {
            if !self.expand(interview_uuid) {
                self.expanded = self.tip_index();
            }
        }
    }

    fn index_of(&self, interview_uuid: Uuid) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.interview_uuid == interview_uuid)
    }
}
