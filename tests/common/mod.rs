#![allow(dead_code)] // Each test binary uses a different subset of the helpers

pub mod builders;
pub mod mock_backend;
pub mod strategies;

pub use builders::*;
pub use mock_backend::*;

use std::sync::Arc;

use interview_chain::config::EngineConfig;
use interview_chain::orchestration::ChainManager;

/// A manager over a fresh recording backend with default configuration
pub fn manager_with_mock() -> (ChainManager, Arc<MockChainBackend>) {
    let backend = Arc::new(MockChainBackend::new());
    let manager = ChainManager::new(backend.clone(), EngineConfig::default());
    (manager, backend)
}
