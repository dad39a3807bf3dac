use super::attempt::AttemptRecord;
use super::config::ManualConfiguration;
use crate::error::Result;
use async_trait::async_trait;

/// Identifier of a terminal in the Record Store.
pub type TerminalId = String;

/// Append-only source of field observations.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn append(&self, terminal: &str, attempt: AttemptRecord) -> Result<()>;
    /// Every attempt recorded for the terminal, read as one consistent snapshot.
    async fn snapshot(&self, terminal: &str) -> Result<Vec<AttemptRecord>>;
}

/// Holder of each terminal's declared configuration document.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    async fn store(&self, terminal: &str, config: ManualConfiguration) -> Result<()>;
    async fn get(&self, terminal: &str) -> Result<Option<ManualConfiguration>>;
}

pub type AttemptStoreBox = Box<dyn AttemptStore>;
pub type ConfigurationStoreBox = Box<dyn ConfigurationStore>;
