//! Deferred Next/Rescheduled commits: ordering, failure windows, manual
//! reconciliation, cancellation, and duplicate-submission handling.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use interview_chain::backend::BackendError;
use interview_chain::config::EngineConfig;
use interview_chain::models::{InterviewOutcome, InvariantViolation, RejectionReason};
use interview_chain::orchestration::{ChainManager, SubmissionKind};
use interview_chain::state_machine::{DeferredKind, OutcomeChoice, StateMachineError};
use interview_chain::validation::OutcomeForm;
use interview_chain::{ChainError, EndInterviewResult};
use uuid::Uuid;

/// A chain whose tip has been ended with `choice`, awaiting its successor
async fn chain_awaiting(manager: &ChainManager, choice: OutcomeChoice) -> (Uuid, Uuid) {
    let chain_uuid = manager
        .create_chain(&DraftBuilder::new_chain().build())
        .await
        .unwrap();
    let tip = manager.chain(chain_uuid).unwrap().interviews[0].interview_uuid;
    let result = manager
        .end_interview(chain_uuid, tip, &OutcomeForm::new(choice))
        .await
        .unwrap();
    assert!(matches!(result, EndInterviewResult::AwaitingSuccessor(_)));
    (chain_uuid, tip)
}

#[tokio::test]
async fn successor_is_created_strictly_before_finalize() {
    let (manager, backend) = manager_with_mock();
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Rescheduled).await;
    backend.reset_calls();

    manager
        .add_interview(chain_uuid, &DraftBuilder::successor().build())
        .await
        .unwrap();

    let mutations = backend.mutations();
    assert_eq!(mutations.len(), 2);
    assert!(matches!(
        mutations[0],
        BackendCall::AddInterview {
            is_reschedule: true,
            ..
        }
    ));
    assert_eq!(
        mutations[1],
        BackendCall::FinalizeOutcome {
            interview_uuid: first,
            outcome: InterviewOutcome::NoDecision
        }
    );
}

#[tokio::test]
async fn finalize_failure_is_recorded_for_manual_reconciliation() {
    let (manager, backend) = manager_with_mock();
    let mut events = manager.subscribe();
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Next).await;

    backend.fail(
        Operation::FinalizeOutcome,
        BackendError::Timeout {
            operation: "finalize_outcome".to_string(),
        },
    );
    let err = manager
        .add_interview(chain_uuid, &DraftBuilder::successor().build())
        .await
        .unwrap_err();

    let successor = match err {
        ChainError::DeferredFinalizeFailed {
            chain_uuid: failed_chain,
            predecessor_interview_uuid,
            successor_interview_uuid,
            ..
        } => {
            assert_eq!(failed_chain, chain_uuid);
            assert_eq!(predecessor_interview_uuid, first);
            successor_interview_uuid
        }
        other => panic!("expected a deferred finalize failure, got {other:?}"),
    };

    // No rollback: the successor stays, the predecessor stays open
    let chain = manager.chain(chain_uuid).unwrap();
    assert_eq!(chain.rounds(), 2);
    assert_eq!(chain.interviews[1].interview_uuid, successor);
    assert_eq!(chain.interviews[0].interview_outcome, None);
    assert!(matches!(
        chain.check_invariants().as_slice(),
        [InvariantViolation::OpenPredecessor { position: 0, .. }]
    ));

    let unreconciled = manager.unreconciled();
    assert_eq!(unreconciled.len(), 1);
    assert_eq!(unreconciled[0].kind, DeferredKind::Next);
    assert_eq!(unreconciled[0].successor_interview_uuid, successor);
    assert!(unreconciled[0].error.contains("timed out"));

    let mut saw_unreconciled = false;
    while let Ok(event) = events.try_recv() {
        if event.name == "chain.finalize_unreconciled" {
            assert_eq!(event.context["predecessor_interview_uuid"], first.to_string());
            saw_unreconciled = true;
        }
    }
    assert!(saw_unreconciled);

    // No automatic retry happened
    assert_eq!(backend.finalize_calls().len(), 1);

    // A manual retry while the backend is still failing keeps the record
    let err = manager.retry_finalize(chain_uuid).await.unwrap_err();
    assert!(matches!(err, ChainError::Backend(BackendError::Timeout { .. })));
    assert_eq!(manager.unreconciled().len(), 1);

    backend.clear_failure(Operation::FinalizeOutcome);
    let receipt = manager.retry_finalize(chain_uuid).await.unwrap();
    assert_eq!(receipt.predecessor_interview_uuid, first);
    assert_eq!(receipt.successor_interview_uuid, successor);
    assert!(manager.unreconciled().is_empty());

    let chain = manager.chain(chain_uuid).unwrap();
    assert_eq!(chain.interviews[0].interview_outcome, Some(InterviewOutcome::Next));
    assert!(chain.check_invariants().is_empty());

    let err = manager.retry_finalize(chain_uuid).await.unwrap_err();
    assert!(matches!(err, ChainError::NothingToReconcile(id) if id == chain_uuid));
}

#[tokio::test]
async fn cancel_discards_intent_without_backend_effect() {
    let (manager, backend) = manager_with_mock();
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Next).await;
    let mut events = manager.subscribe();
    backend.reset_calls();

    let intent = manager.cancel_pending(chain_uuid).await.unwrap();
    assert_eq!(intent.predecessor_interview_uuid, first);
    assert!(manager.pending_intent(chain_uuid).is_none());
    assert!(backend.calls().is_empty());
    assert_eq!(events.recv().await.unwrap().name, "chain.successor_cancelled");

    let err = manager.cancel_pending(chain_uuid).await.unwrap_err();
    assert!(matches!(err, ChainError::NoPendingIntent(_)));

    // Back to Active with an open tip: ending it again works
    let result = manager
        .end_interview(
            chain_uuid,
            first,
            &OutcomeForm::new(OutcomeChoice::Offer).with_comment("Accepted"),
        )
        .await
        .unwrap();
    assert!(matches!(result, EndInterviewResult::Finalized { .. }));
}

#[tokio::test]
async fn invalid_successor_form_keeps_intent() {
    let (manager, backend) = manager_with_mock();
    let (chain_uuid, _) = chain_awaiting(&manager, OutcomeChoice::Next).await;
    backend.reset_calls();

    let err = manager
        .add_interview(chain_uuid, &DraftBuilder::successor().without_type().build())
        .await
        .unwrap_err();
    assert!(err.field_errors().is_some_and(|e| e.interview_type));
    assert!(backend.mutations().is_empty());
    assert!(manager.pending_intent(chain_uuid).is_some());

    manager
        .add_interview(chain_uuid, &DraftBuilder::successor().build())
        .await
        .unwrap();
    assert_eq!(manager.chain(chain_uuid).unwrap().rounds(), 2);
}

#[tokio::test]
async fn choosing_again_replaces_the_intent() {
    let (manager, _backend) = manager_with_mock();
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Next).await;

    manager
        .end_interview(chain_uuid, first, &OutcomeForm::new(OutcomeChoice::Rescheduled))
        .await
        .unwrap();
    assert_eq!(
        manager.pending_intent(chain_uuid).map(|i| i.kind),
        Some(DeferredKind::Rescheduled)
    );
}

#[tokio::test]
async fn awaiting_successor_blocks_direct_outcomes_and_edits() {
    let (manager, backend) = manager_with_mock();
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Next).await;
    backend.reset_calls();

    let err = manager
        .end_interview(
            chain_uuid,
            first,
            &OutcomeForm::new(OutcomeChoice::Offer).with_comment("Skipping ahead"),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ChainError::StateMachine(StateMachineError::InvalidTransition { .. })
    ));

    let draft = manager.edit_draft(chain_uuid, first).unwrap();
    assert!(manager.edit_interview(chain_uuid, first, &draft).await.is_err());

    assert!(backend.mutations().is_empty());
    assert!(manager.pending_intent(chain_uuid).is_some());
}

#[tokio::test]
async fn stale_intent_is_discarded_when_chain_moved_on() {
    let backend = Arc::new(MockChainBackend::new());
    let session = ChainManager::new(backend.clone(), EngineConfig::default());
    let other_session = ChainManager::new(backend.clone(), EngineConfig::default());

    let (chain_uuid, first) = chain_awaiting(&session, OutcomeChoice::Next).await;

    // Another session advances the same chain
    other_session.load_chain(chain_uuid).await.unwrap();
    other_session
        .end_interview(chain_uuid, first, &OutcomeForm::new(OutcomeChoice::Next))
        .await
        .unwrap();
    other_session
        .add_interview(chain_uuid, &DraftBuilder::successor().build())
        .await
        .unwrap();

    session.refresh_chain(chain_uuid).await.unwrap();
    backend.reset_calls();

    let err = session
        .add_interview(chain_uuid, &DraftBuilder::successor().build())
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::StaleIntent { .. }));
    assert!(session.pending_intent(chain_uuid).is_none());
    assert!(backend.mutations().is_empty());
    assert_eq!(backend.stored_chain(chain_uuid).await.rounds(), 2);
}

#[tokio::test]
async fn duplicate_submission_is_ignored_while_in_flight() {
    let backend = Arc::new(MockChainBackend::new().with_latency(Duration::from_millis(50)));
    let manager = ChainManager::new(backend.clone(), EngineConfig::default());
    let chain_uuid = manager
        .create_chain(&DraftBuilder::new_chain().build())
        .await
        .unwrap();
    let tip = manager.chain(chain_uuid).unwrap().interviews[0].interview_uuid;
    backend.reset_calls();

    let form = OutcomeForm::new(OutcomeChoice::Offer).with_comment("Great culture fit");
    let (first, second) = tokio::join!(
        manager.end_interview(chain_uuid, tip, &form),
        manager.end_interview(chain_uuid, tip, &form),
    );

    assert!(first.is_ok());
    let err = second.unwrap_err();
    assert!(matches!(
        err,
        ChainError::SubmissionInFlight {
            action: SubmissionKind::EndInterview,
            ..
        }
    ));
    assert!(!err.is_user_visible());
    assert_eq!(backend.finalize_calls().len(), 1);
}

#[tokio::test]
async fn end_interview_is_refused_while_successor_commits() {
    let backend = Arc::new(MockChainBackend::new().with_latency(Duration::from_millis(50)));
    let manager = ChainManager::new(backend.clone(), EngineConfig::default());
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Next).await;
    backend.reset_calls();

    let offer = OutcomeForm::new(OutcomeChoice::Offer).with_comment("Great culture fit");
    let successor = DraftBuilder::successor().build();
    let (added, ended) = tokio::join!(
        manager.add_interview(chain_uuid, &successor),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            manager.end_interview(chain_uuid, first, &offer).await
        },
    );

    let second = added.unwrap();
    assert!(matches!(
        ended.unwrap_err(),
        ChainError::SubmissionInFlight {
            action: SubmissionKind::EndInterview,
            held_by: SubmissionKind::AddInterview,
            ..
        }
    ));

    let finalized = backend.finalize_calls();
    assert_eq!(finalized.len(), 1);
    assert!(matches!(
        &finalized[0],
        BackendCall::FinalizeOutcome { interview_uuid, outcome }
            if *interview_uuid == first && *outcome == InterviewOutcome::Next
    ));

    let chain = backend.stored_chain(chain_uuid).await;
    let outcomes: Vec<_> = chain.interviews.iter().map(|i| i.interview_outcome).collect();
    assert_eq!(outcomes, vec![Some(InterviewOutcome::Next), None]);
    assert_eq!(chain.tip().map(|t| t.interview_uuid), Some(second));
    assert!(chain.check_invariants().is_empty());
}

#[tokio::test]
async fn edit_is_refused_while_successor_commits() {
    let backend = Arc::new(MockChainBackend::new().with_latency(Duration::from_millis(50)));
    let manager = ChainManager::new(backend.clone(), EngineConfig::default());
    let (chain_uuid, first) = chain_awaiting(&manager, OutcomeChoice::Next).await;
    let mut rejected = manager.edit_draft(chain_uuid, first).unwrap();
    rejected.notes.interview_outcome = Some(InterviewOutcome::Rejected);
    rejected.notes.rejection_reason = Some(RejectionReason::CultureFit);
    backend.reset_calls();

    let successor = DraftBuilder::successor().build();
    let (added, edited) = tokio::join!(
        manager.add_interview(chain_uuid, &successor),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            manager.edit_interview(chain_uuid, first, &rejected).await
        },
    );

    assert!(added.is_ok());
    assert!(matches!(
        edited.unwrap_err(),
        ChainError::SubmissionInFlight {
            action: SubmissionKind::EditInterview,
            held_by: SubmissionKind::AddInterview,
            ..
        }
    ));
    assert!(!backend
        .mutations()
        .iter()
        .any(|call| matches!(call, BackendCall::EditInterview { .. })));

    let chain = manager.chain(chain_uuid).unwrap();
    assert_eq!(chain.rounds(), 2);
    assert_eq!(chain.interviews[0].interview_outcome, Some(InterviewOutcome::Next));
    assert_eq!(chain.interviews[0].rejection_reason, None);
    assert!(chain.check_invariants().is_empty());
}

#[tokio::test]
async fn in_flight_flags_are_per_chain() {
    let backend = Arc::new(MockChainBackend::new().with_latency(Duration::from_millis(20)));
    let manager = ChainManager::new(backend.clone(), EngineConfig::default());
    let a = manager
        .create_chain(&DraftBuilder::new_chain().build())
        .await
        .unwrap();
    let b = manager
        .create_chain(&DraftBuilder::new_chain().end_client("Initrode").build())
        .await
        .unwrap();
    let tip_a = manager.chain(a).unwrap().interviews[0].interview_uuid;
    let tip_b = manager.chain(b).unwrap().interviews[0].interview_uuid;

    let form = OutcomeForm::new(OutcomeChoice::PendingUpdate).with_comment("Waiting");
    let (ra, rb) = tokio::join!(
        manager.end_interview(a, tip_a, &form),
        manager.end_interview(b, tip_b, &form),
    );
    assert!(ra.is_ok());
    assert!(rb.is_ok());
}

#[tokio::test]
async fn failed_refresh_marks_cache_stale() {
    let (manager, backend) = manager_with_mock();
    let chain_uuid = manager
        .create_chain(&DraftBuilder::new_chain().build())
        .await
        .unwrap();
    let tip = manager.chain(chain_uuid).unwrap().interviews[0].interview_uuid;

    backend.fail(Operation::FetchChain, network_error());
    let result = manager
        .end_interview(
            chain_uuid,
            tip,
            &OutcomeForm::new(OutcomeChoice::PendingUpdate).with_comment("Waiting on panel"),
        )
        .await;
    assert!(result.is_ok(), "a failed re-read does not fail the action");
    assert!(manager.is_stale(chain_uuid));
    assert_eq!(
        manager.chain(chain_uuid).unwrap().interviews[0].interview_outcome,
        None
    );

    backend.clear_failure(Operation::FetchChain);
    let chain = manager.refresh_chain(chain_uuid).await.unwrap();
    assert!(!manager.is_stale(chain_uuid));
    assert_eq!(
        chain.interviews[0].interview_outcome,
        Some(InterviewOutcome::PendingUpdate)
    );
}

#[tokio::test]
async fn unknown_chain_is_reported() {
    let (manager, _backend) = manager_with_mock();
    let err = manager
        .end_interview(Uuid::new_v4(), Uuid::new_v4(), &OutcomeForm::new(OutcomeChoice::Next))
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::ChainNotFound(_)));
}
