#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Interview Chain Core
//!
//! Lifecycle engine for interview chains: a candidate's sequence of
//! interviews for one job opportunity, modeled as an ordered list whose
//! status follows the outcome of its most recent interview.
//!
//! ## Overview
//!
//! A chain starts with one interview. Ending the tip interview with Offer,
//! Rejected or Pending Update finalizes it in place. Next and Rescheduled are
//! deferred: the successor interview is created first, and only then is the
//! predecessor's outcome recorded, so a chain is never left with a Next
//! outcome and no successor.
//!
//! ## Module Organization
//!
//! - [`models`] - Interviews, chains, and the step-tagged wizard drafts
//! - [`validation`] - Per-step wizard validation and the outcome form
//! - [`state_machine`] - Transition engine, guards, actions, deferred commits
//! - [`orchestration`] - Session-scoped [`ChainManager`] and in-flight flags
//! - [`projection`] - Timeline view model for one chain
//! - [`backend`] - The persistence collaborator seam and an in-memory backend
//! - [`events`] - Lifecycle event broadcast
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Crate-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use interview_chain::backend::InMemoryChainBackend;
//! use interview_chain::config::EngineConfig;
//! use interview_chain::models::InterviewDraft;
//! use interview_chain::orchestration::ChainManager;
//!
//! # async fn example(draft: InterviewDraft) -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(InMemoryChainBackend::with_actor("rita"));
//! let manager = ChainManager::new(backend, EngineConfig::default());
//!
//! let chain_uuid = manager.create_chain(&draft).await?;
//! let projection = manager.projection(chain_uuid);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod projection;
pub mod state_machine;
pub mod validation;

pub use backend::{BackendError, ChainBackend, InMemoryChainBackend};
pub use config::{ConfigManager, EngineConfig};
pub use error::{ChainError, Result};
pub use models::{ChainStatus, Interview, InterviewChain, InterviewDraft, InterviewOutcome};
pub use orchestration::{ChainManager, EndInterviewResult};
pub use projection::ChainProjection;
pub use state_machine::{ChainState, DeferredKind, EndOutcome, OutcomeChoice, PendingIntent};
pub use validation::{FieldErrors, FormFlow, OutcomeForm, StepValidator, WizardStep};
