// src/registry/mod.rs
mod loader;
mod memory;

pub use loader::load_checks;
pub use memory::InMemoryRegistry;

use crate::check::{Check, CheckId, CheckState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    #[error("check {0} not found")]
    NotFound(CheckId),

    #[error("write conflict on check {0}")]
    Conflict(CheckId),
}

/// Store that owns the registered checks. The engine only reads the full
/// list and writes back evaluation results keyed by check id.
#[async_trait]
pub trait CheckRegistry: Send + Sync {
    async fn list_checks(&self) -> Result<Vec<Check>, RegistryError>;

    async fn update_check_state(
        &self,
        id: &CheckId,
        state: CheckState,
        checked_at: DateTime<Utc>,
    ) -> Result<(), RegistryError>;
}
