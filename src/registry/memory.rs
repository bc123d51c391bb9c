// src/registry/memory.rs
use super::{CheckRegistry, RegistryError};
use crate::check::{Check, CheckId, CheckState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    checks: Arc<DashMap<CheckId, Check>>,
}

impl InMemoryRegistry {
    pub fn new(checks: Vec<Check>) -> Self {
        let registry = Self::default();
        for check in checks {
            registry.insert(check);
        }
        registry
    }

    pub fn insert(&self, check: Check) {
        if let Some(previous) = self.checks.insert(check.id.clone(), check) {
            tracing::warn!("Replaced existing check {}", previous.id);
        }
    }

    pub fn get(&self, id: &CheckId) -> Option<Check> {
        self.checks.get(id).map(|c| c.clone())
    }

    pub fn remove(&self, id: &CheckId) -> bool {
        self.checks.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[async_trait]
impl CheckRegistry for InMemoryRegistry {
    async fn list_checks(&self) -> Result<Vec<Check>, RegistryError> {
        let mut checks: Vec<Check> = self
            .checks
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        checks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(checks)
    }

    async fn update_check_state(
        &self,
        id: &CheckId,
        state: CheckState,
        checked_at: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let mut entry = self
            .checks
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        entry.state = state;
        entry.last_checked_at = Some(checked_at);
        Ok(())
    }
}
