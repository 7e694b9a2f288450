//! # System Constants
//!
//! Event names and operational defaults shared by the chain lifecycle engine.

/// Lifecycle events published by the chain manager
pub mod events {
    // Chain lifecycle events
    pub const CHAIN_CREATED: &str = "chain.created";
    pub const CHAIN_INTERVIEW_ADDED: &str = "chain.interview_added";
    pub const CHAIN_INTERVIEW_EDITED: &str = "chain.interview_edited";
    pub const CHAIN_OUTCOME_FINALIZED: &str = "chain.outcome_finalized";

    // Deferred transition events
    pub const CHAIN_SUCCESSOR_PENDING: &str = "chain.successor_pending";
    pub const CHAIN_SUCCESSOR_CANCELLED: &str = "chain.successor_cancelled";
    pub const CHAIN_FINALIZE_UNRECONCILED: &str = "chain.finalize_unreconciled";
}

/// Operational defaults
pub mod defaults {
    /// Capacity of the lifecycle event broadcast channel
    pub const EVENT_CHANNEL_CAPACITY: usize = 256;

    /// Environment used when no environment variable is set
    pub const ENVIRONMENT: &str = "development";

    /// Prefix for configuration environment variables
    pub const CONFIG_ENV_PREFIX: &str = "INTERVIEW_CHAIN";

    /// Default configuration file, relative to the working directory
    pub const CONFIG_FILE: &str = "config/interview-chain.toml";
}
