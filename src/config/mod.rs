//! # Engine Configuration
//!
//! Session, validation and logging settings for the chain lifecycle engine.
//! Values are layered by [`ConfigManager`]: built-in defaults, then an
//! optional TOML file, then `INTERVIEW_CHAIN_*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interview_chain::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let capacity = manager.config().session.event_channel_capacity;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};

use crate::constants::defaults::EVENT_CHANNEL_CAPACITY;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring interview-chain.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-session cache and event settings
    pub session: SessionConfig,

    /// Wizard validation rules
    pub validation: ValidationConfig,

    /// Logging output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the lifecycle event broadcast channel
    pub event_channel_capacity: usize,

    /// Re-read a chain from the backend after every successful mutation
    pub refresh_after_mutation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: EVENT_CHANNEL_CAPACITY,
            refresh_after_mutation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Brand-new chains must name the job board they were sourced from
    pub require_job_board_for_new_chain: bool,

    /// End time must fall after start time
    pub enforce_time_order: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_job_board_for_new_chain: true,
            enforce_time_order: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; derived from the environment when unset
    pub level: Option<String>,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl EngineConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.session.event_channel_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "session.event_channel_capacity",
                "0",
                "the event channel needs room for at least one event",
            ));
        }
        Ok(())
    }
}
