//! # Deferred Commit Coordinator
//!
//! Next and Rescheduled only finalize the tip interview after its successor
//! has been created. The coordinator holds the pending intent between the
//! outcome choice and the successor submission, and owns the single code
//! path that issues the two backend calls in order:
//!
//! 1. create the successor (on failure: stop, predecessor untouched)
//! 2. finalize the predecessor with the deferred outcome
//!
//! A failure in step 2 leaves the successor persisted and the predecessor
//! without an outcome. That state is recorded as an [`UnreconciledFinalize`]
//! and left for a manual [`DeferredCommitCoordinator::retry_finalize`]; the
//! successor is never rolled back and nothing is retried automatically.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::events::{DeferredKind, OutcomeFinalization};
use super::guards::{PredecessorIsTipGuard, StateGuard};
use crate::backend::ChainBackend;
use crate::constants::events::CHAIN_FINALIZE_UNRECONCILED;
use crate::error::{ChainError, Result};
use crate::events::publisher::EventPublisher;
use crate::logging::log_error;
use crate::models::{ContactStep, InterviewChain, InterviewDraft, NewInterview};

/// A deferred transition waiting for its successor interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingIntent {
    pub kind: DeferredKind,
    pub target_chain_uuid: Uuid,
    pub predecessor_interview_uuid: Uuid,
    /// The predecessor's end-client contact, offered to the add-interview form
    pub prefill: ContactStep,
    pub created_at: DateTime<Utc>,
}

impl PendingIntent {
    /// Intent to succeed the chain's current tip; `None` for an empty chain
    pub fn for_tip(chain: &InterviewChain, kind: DeferredKind) -> Option<Self> {
        let tip = chain.tip()?;
        Some(Self {
            kind,
            target_chain_uuid: chain.chain_uuid,
            predecessor_interview_uuid: tip.interview_uuid,
            prefill: ContactStep {
                end_client_name: Some(tip.end_client_name.clone()),
                end_client_recruiter_name: Some(tip.end_client_recruiter_name.clone()),
                end_client_recruiter_email: Some(tip.end_client_recruiter_email.clone()),
                end_client_recruiter_phone: tip.end_client_recruiter_phone.clone(),
                job_board_name: None,
                job_board_url: None,
            },
            created_at: Utc::now(),
        })
    }

    /// A fresh add-interview draft with the predecessor's contact filled in
    pub fn seed_draft(&self) -> InterviewDraft {
        let mut draft = InterviewDraft::new();
        draft.prefill_contact(&self.prefill);
        draft
    }
}

/// A successor that exists while its predecessor's outcome was never recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreconciledFinalize {
    pub chain_uuid: Uuid,
    pub kind: DeferredKind,
    pub predecessor_interview_uuid: Uuid,
    pub successor_interview_uuid: Uuid,
    pub finalization: OutcomeFinalization,
    /// Last failure reported by the backend
    pub error: String,
    pub occurred_at: DateTime<Utc>,
}

/// Result of a completed deferred transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub chain_uuid: Uuid,
    pub kind: DeferredKind,
    pub predecessor_interview_uuid: Uuid,
    pub successor_interview_uuid: Uuid,
}

/// Holds pending intents and commits them against the backend
pub struct DeferredCommitCoordinator {
    backend: Arc<dyn ChainBackend>,
    event_publisher: Arc<EventPublisher>,
    /// At most one intent per chain
    pending: DashMap<Uuid, PendingIntent>,
    unreconciled: Mutex<Vec<UnreconciledFinalize>>,
}

impl std::fmt::Debug for DeferredCommitCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredCommitCoordinator")
            .field("pending", &self.pending.len())
            .field("unreconciled", &self.unreconciled.lock().len())
            .finish()
    }
}

impl DeferredCommitCoordinator {
    pub fn new(backend: Arc<dyn ChainBackend>, event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            backend,
            event_publisher,
            pending: DashMap::new(),
            unreconciled: Mutex::new(Vec::new()),
        }
    }

    /// Hold an intent, returning the one it replaced
    pub fn record(&self, intent: PendingIntent) -> Option<PendingIntent> {
        let replaced = self.pending.insert(intent.target_chain_uuid, intent);
        if let Some(previous) = &replaced {
            info!(
                chain_uuid = %previous.target_chain_uuid,
                replaced_kind = %previous.kind,
                "Pending successor replaced"
            );
        }
        replaced
    }

    pub fn pending(&self, chain_uuid: Uuid) -> Option<PendingIntent> {
        self.pending.get(&chain_uuid).map(|entry| entry.value().clone())
    }

    pub fn has_pending(&self, chain_uuid: Uuid) -> bool {
        self.pending.contains_key(&chain_uuid)
    }

    /// Drop the intent for a chain; no backend call is involved
    pub fn discard(&self, chain_uuid: Uuid) -> Option<PendingIntent> {
        self.pending.remove(&chain_uuid).map(|(_, intent)| intent)
    }

    /// Create the successor, then finalize the predecessor.
    ///
    /// `chain` is the session's current view of the target chain. The intent
    /// is consumed whatever the result.
    pub async fn commit(&self, chain: &InterviewChain, successor: NewInterview) -> Result<CommitReceipt> {
        let chain_uuid = chain.chain_uuid;
        let intent = self
            .discard(chain_uuid)
            .ok_or(ChainError::NoPendingIntent(chain_uuid))?;

        let guard = PredecessorIsTipGuard {
            kind: intent.kind,
            predecessor_interview_uuid: intent.predecessor_interview_uuid,
        };
        if let Err(e) = guard.check(chain) {
            warn!(chain_uuid = %chain_uuid, error = %e, "Discarding stale pending successor");
            return Err(ChainError::StaleIntent { chain_uuid });
        }

        let successor = NewInterview {
            is_reschedule: intent.kind.is_reschedule(),
            ..successor
        };

        let successor_interview_uuid = self
            .backend
            .add_interview(chain_uuid, &successor)
            .await
            .map_err(|source| {
                warn!(
                    chain_uuid = %chain_uuid,
                    kind = %intent.kind,
                    error = %source,
                    "Successor creation failed; predecessor left untouched"
                );
                ChainError::SuccessorCreationFailed { chain_uuid, source }
            })?;

        let finalization = intent.kind.finalization();
        if let Err(source) = self
            .backend
            .finalize_outcome(intent.predecessor_interview_uuid, &finalization)
            .await
        {
            self.record_unreconciled(UnreconciledFinalize {
                chain_uuid,
                kind: intent.kind,
                predecessor_interview_uuid: intent.predecessor_interview_uuid,
                successor_interview_uuid,
                finalization,
                error: source.to_string(),
                occurred_at: Utc::now(),
            });
            return Err(ChainError::DeferredFinalizeFailed {
                chain_uuid,
                predecessor_interview_uuid: intent.predecessor_interview_uuid,
                successor_interview_uuid,
                source,
            });
        }

        info!(
            chain_uuid = %chain_uuid,
            kind = %intent.kind,
            predecessor_interview_uuid = %intent.predecessor_interview_uuid,
            successor_interview_uuid = %successor_interview_uuid,
            "Deferred transition committed"
        );

        Ok(CommitReceipt {
            chain_uuid,
            kind: intent.kind,
            predecessor_interview_uuid: intent.predecessor_interview_uuid,
            successor_interview_uuid,
        })
    }

    fn record_unreconciled(&self, record: UnreconciledFinalize) {
        log_error(
            "deferred_commit_coordinator",
            "finalize_outcome",
            &record.error,
            Some(&format!(
                "chain={} predecessor={} successor={}",
                record.chain_uuid,
                record.predecessor_interview_uuid,
                record.successor_interview_uuid
            )),
        );

        let context = serde_json::to_value(&record).unwrap_or_else(|e| {
            serde_json::json!({ "chain_uuid": record.chain_uuid, "serialization_error": e.to_string() })
        });
        if let Err(e) = self
            .event_publisher
            .publish(CHAIN_FINALIZE_UNRECONCILED, context)
        {
            warn!(error = %e, "Failed to publish unreconciled finalize event");
        }

        let mut unreconciled = self.unreconciled.lock();
        unreconciled.retain(|r| r.chain_uuid != record.chain_uuid);
        unreconciled.push(record);
    }

    /// Every successor whose predecessor still lacks its outcome
    pub fn unreconciled(&self) -> Vec<UnreconciledFinalize> {
        self.unreconciled.lock().clone()
    }

    pub fn unreconciled_for(&self, chain_uuid: Uuid) -> Option<UnreconciledFinalize> {
        self.unreconciled
            .lock()
            .iter()
            .find(|r| r.chain_uuid == chain_uuid)
            .cloned()
    }

    /// Re-issue the finalize call a failed deferred transition left behind.
    ///
    /// The record is cleared only when the call succeeds.
    pub async fn retry_finalize(&self, chain_uuid: Uuid) -> Result<CommitReceipt> {
        let record = self
            .unreconciled_for(chain_uuid)
            .ok_or(ChainError::NothingToReconcile(chain_uuid))?;

        match self
            .backend
            .finalize_outcome(record.predecessor_interview_uuid, &record.finalization)
            .await
        {
            Ok(()) => {
                self.unreconciled.lock().retain(|r| r.chain_uuid != chain_uuid);
                info!(
                    chain_uuid = %chain_uuid,
                    predecessor_interview_uuid = %record.predecessor_interview_uuid,
                    "Unreconciled finalize resolved"
                );
                Ok(CommitReceipt {
                    chain_uuid,
                    kind: record.kind,
                    predecessor_interview_uuid: record.predecessor_interview_uuid,
                    successor_interview_uuid: record.successor_interview_uuid,
                })
            }
            Err(e) => {
                if let Some(stored) = self
                    .unreconciled
                    .lock()
                    .iter_mut()
                    .find(|r| r.chain_uuid == chain_uuid)
                {
                    stored.error = e.to_string();
                }
                Err(ChainError::Backend(e))
            }
        }
    }
}
