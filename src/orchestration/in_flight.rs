//! Single in-flight submission flags.
//!
//! One flag per chain. While any submission against a chain is committing,
//! every other submission against that chain is refused, whatever its
//! action. Chains do not block each other. Chain creation has no chain yet
//! and holds a single flag of its own.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The user actions that submit to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    CreateChain,
    AddInterview,
    EditInterview,
    EndInterview,
    RetryFinalize,
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateChain => write!(f, "create_chain"),
            Self::AddInterview => write!(f, "add_interview"),
            Self::EditInterview => write!(f, "edit_interview"),
            Self::EndInterview => write!(f, "end_interview"),
            Self::RetryFinalize => write!(f, "retry_finalize"),
        }
    }
}

/// What a flag is raised on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FlagKey {
    Creation,
    Chain(Uuid),
}

impl From<Option<Uuid>> for FlagKey {
    fn from(chain_uuid: Option<Uuid>) -> Self {
        chain_uuid.map_or(Self::Creation, Self::Chain)
    }
}

/// Registry of submissions currently being committed, keyed on the chain
/// and remembering which action raised each flag
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    flags: Arc<DashMap<FlagKey, SubmissionKind>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag for `chain_uuid` on behalf of `kind`.
    ///
    /// Returns the action already holding the flag when it is raised.
    pub fn try_acquire(
        &self,
        kind: SubmissionKind,
        chain_uuid: Option<Uuid>,
    ) -> Result<InFlightGuard, SubmissionKind> {
        let key = FlagKey::from(chain_uuid);
        match self.flags.entry(key) {
            Entry::Occupied(held) => Err(*held.get()),
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(InFlightGuard {
                    flags: Arc::clone(&self.flags),
                    key,
                    kind,
                    chain_uuid,
                })
            }
        }
    }

    /// The action currently committing against `chain_uuid`, if any
    pub fn holder(&self, chain_uuid: Option<Uuid>) -> Option<SubmissionKind> {
        self.flags.get(&FlagKey::from(chain_uuid)).map(|held| *held)
    }

    pub fn is_in_flight(&self, chain_uuid: Option<Uuid>) -> bool {
        self.flags.contains_key(&FlagKey::from(chain_uuid))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Lowers its flag when dropped, including on early return or panic unwind
#[derive(Debug)]
pub struct InFlightGuard {
    flags: Arc<DashMap<FlagKey, SubmissionKind>>,
    key: FlagKey,
    kind: SubmissionKind,
    chain_uuid: Option<Uuid>,
}

impl InFlightGuard {
    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn chain_uuid(&self) -> Option<Uuid> {
        self.chain_uuid
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flags.remove(&self.key);
    }
}
