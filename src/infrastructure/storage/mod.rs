pub mod in_memory;
pub mod json_file;

use crate::core::errors::LedgerError;
use crate::core::models::QueuedExpense;
use async_trait::async_trait;

/// Durable queue of expenses written while offline.
///
/// Entries are returned in insertion order. Ids are unique within the log.
#[async_trait]
pub trait WriteLog: Send + Sync {
    async fn enqueue(&self, expense: QueuedExpense) -> Result<(), LedgerError>;
    async fn list_all(&self) -> Result<Vec<QueuedExpense>, LedgerError>;
    /// Absent ids are ignored.
    async fn remove(&self, id: &str) -> Result<(), LedgerError>;
    async fn count(&self) -> Result<usize, LedgerError>;
}
