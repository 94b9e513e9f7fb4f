use crate::core::errors::LedgerError;
use crate::core::models::QueuedExpense;
use crate::infrastructure::storage::WriteLog;
use async_trait::async_trait;
use tokio::sync::Mutex;

pub struct InMemoryWriteLog {
    entries: Mutex<Vec<QueuedExpense>>,
    capacity: Option<usize>,
}

impl InMemoryWriteLog {
    pub fn new() -> Self {
        InMemoryWriteLog {
            entries: Mutex::new(Vec::new()),
            capacity: None,
        }
    }

    /// Rejects writes past `capacity`, the way a browser store rejects writes over quota.
    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryWriteLog {
            entries: Mutex::new(Vec::new()),
            capacity: Some(capacity),
        }
    }
}

impl Default for InMemoryWriteLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WriteLog for InMemoryWriteLog {
    async fn enqueue(&self, expense: QueuedExpense) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().await;
        if self.capacity.is_some_and(|cap| entries.len() >= cap) {
            return Err(LedgerError::StorageUnavailable("quota exceeded".to_string()));
        }
        if entries.iter().any(|e| e.id == expense.id) {
            return Err(LedgerError::DuplicateEntry(expense.id));
        }
        entries.push(expense);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<QueuedExpense>, LedgerError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn remove(&self, id: &str) -> Result<(), LedgerError> {
        self.entries.lock().await.retain(|e| e.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.entries.lock().await.len())
    }
}
