use crate::models::ChainStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable lifecycle state of a chain inside one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainState {
    /// The tip interview is open for lifecycle actions
    Active,
    /// Next or Rescheduled was chosen; a successor interview must be created
    /// before the tip's outcome is finalized
    AwaitingSuccessor,
    /// The tip carries an offer
    Successful,
    /// The tip carries a rejection
    Unsuccessful,
}

impl ChainState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Unsuccessful)
    }

    /// Check if a deferred transition is holding this chain
    pub fn is_awaiting_successor(&self) -> bool {
        matches!(self, Self::AwaitingSuccessor)
    }

    /// State implied by a chain's derived status when nothing is pending
    pub fn from_status(status: ChainStatus) -> Self {
        match status {
            ChainStatus::Active => Self::Active,
            ChainStatus::Successful => Self::Successful,
            ChainStatus::Unsuccessful => Self::Unsuccessful,
        }
    }

    /// The status a chain in this state reports to list views
    pub fn status(&self) -> ChainStatus {
        match self {
            Self::Active | Self::AwaitingSuccessor => ChainStatus::Active,
            Self::Successful => ChainStatus::Successful,
            Self::Unsuccessful => ChainStatus::Unsuccessful,
        }
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::AwaitingSuccessor => write!(f, "awaiting_successor"),
            Self::Successful => write!(f, "successful"),
            Self::Unsuccessful => write!(f, "unsuccessful"),
        }
    }
}

impl std::str::FromStr for ChainState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "awaiting_successor" => Ok(Self::AwaitingSuccessor),
            "successful" => Ok(Self::Successful),
            "unsuccessful" => Ok(Self::Unsuccessful),
            _ => Err(format!("Invalid chain state: {s}")),
        }
    }
}

/// Default state for new chains
impl Default for ChainState {
    fn default() -> Self {
        Self::Active
    }
}
