use crate::domain::attempt::AttemptRecord;
use crate::domain::config::ManualConfiguration;
use crate::domain::ports::{AttemptStore, ConfigurationStore, TerminalId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for field attempts.
///
/// Uses `Arc<RwLock<HashMap<TerminalId, Vec<AttemptRecord>>>>`; a snapshot is
/// cloned under the read lock, so it never sees half of a concurrent append.
#[derive(Default, Clone)]
pub struct InMemoryAttemptStore {
    attempts: Arc<RwLock<HashMap<TerminalId, Vec<AttemptRecord>>>>,
}

impl InMemoryAttemptStore {
    /// Creates a new, empty in-memory attempt store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptStore for InMemoryAttemptStore {
    async fn append(&self, terminal: &str, attempt: AttemptRecord) -> Result<()> {
        let mut attempts = self.attempts.write().await;
        attempts
            .entry(terminal.to_string())
            .or_default()
            .push(attempt);
        Ok(())
    }

    async fn snapshot(&self, terminal: &str) -> Result<Vec<AttemptRecord>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(terminal).cloned().unwrap_or_default())
    }
}

/// A thread-safe in-memory store for configuration documents.
#[derive(Default, Clone)]
pub struct InMemoryConfigurationStore {
    configs: Arc<RwLock<HashMap<TerminalId, ManualConfiguration>>>,
}

impl InMemoryConfigurationStore {
    /// Creates a new, empty in-memory configuration store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn store(&self, terminal: &str, config: ManualConfiguration) -> Result<()> {
        let mut configs = self.configs.write().await;
        configs.insert(terminal.to_string(), config);
        Ok(())
    }

    async fn get(&self, terminal: &str) -> Result<Option<ManualConfiguration>> {
        let configs = self.configs.read().await;
        Ok(configs.get(terminal).cloned())
    }
}
