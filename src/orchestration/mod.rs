//! # Orchestration
//!
//! The session-scoped manager that routes user actions through validation,
//! the transition engine and the backend, plus its duplicate-submission flags.

pub mod chain_manager;
pub mod in_flight;

pub use chain_manager::{ChainManager, EndInterviewResult};
pub use in_flight::{InFlightGuard, InFlightRegistry, SubmissionKind};
