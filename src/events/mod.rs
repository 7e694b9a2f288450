//! # Lifecycle Events
//!
//! Broadcast of chain lifecycle events to whatever the host wires up
//! (notifications, list refreshes, audit sinks).

pub mod publisher;

// Re-export key types for convenience
pub use publisher::{EventPublisher, PublishError, PublishedEvent};
