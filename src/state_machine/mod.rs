// Chain lifecycle state machine
//
// Transition engine for interview chains: the state/event table, guards that
// gate each transition, post-commit actions, and the coordinator for the two
// outcomes that must create a successor interview before they finalize.

pub mod actions;
pub mod chain_state_machine;
pub mod deferred;
pub mod errors;
pub mod events;
pub mod guards;
pub mod states;

// Re-export main types for convenient access
pub use chain_state_machine::{ChainAction, ChainStateMachine, Resolution};
pub use deferred::{CommitReceipt, DeferredCommitCoordinator, PendingIntent, UnreconciledFinalize};
pub use errors::{ActionError, GuardError, StateMachineError};
pub use events::{
    ChainEvent, DeferredKind, EndOutcome, FinalizationNote, OutcomeChoice, OutcomeFinalization,
};
pub use states::ChainState;

// Common traits and utilities
pub use actions::StateAction;
pub use guards::StateGuard;
