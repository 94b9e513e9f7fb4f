use crate::core::errors::LedgerError;
use crate::core::models::QueuedExpense;
use crate::infrastructure::storage::WriteLog;
use async_trait::async_trait;
use log::{debug, error};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Write log persisted as a JSON array in a single file.
///
/// The file is loaded once on open; every mutation rewrites it through a
/// temporary sibling and a rename, and the in-memory copy is only updated
/// once the write has landed.
pub struct JsonFileWriteLog {
    path: PathBuf,
    entries: Mutex<Vec<QueuedExpense>>,
    capacity: Option<usize>,
}

impl JsonFileWriteLog {
    pub async fn open(path: impl AsRef<Path>, capacity: Option<usize>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                LedgerError::StorageUnavailable(format!(
                    "corrupt write log {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened write log {} with {} entries", path.display(), entries.len());
        Ok(JsonFileWriteLog {
            path,
            entries: Mutex::new(entries),
            capacity,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &[QueuedExpense]) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        let result = async {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;
        result.map_err(|e| {
            error!("Failed to persist write log {}: {}", self.path.display(), e);
            LedgerError::StorageUnavailable(e.to_string())
        })
    }
}

#[async_trait]
impl WriteLog for JsonFileWriteLog {
    async fn enqueue(&self, expense: QueuedExpense) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().await;
        if self.capacity.is_some_and(|cap| entries.len() >= cap) {
            return Err(LedgerError::StorageUnavailable("quota exceeded".to_string()));
        }
        if entries.iter().any(|e| e.id == expense.id) {
            return Err(LedgerError::DuplicateEntry(expense.id));
        }
        let mut next = entries.clone();
        next.push(expense);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<QueuedExpense>, LedgerError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn remove(&self, id: &str) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().await;
        if !entries.iter().any(|e| e.id == id) {
            return Ok(());
        }
        let next: Vec<QueuedExpense> = entries.iter().filter(|e| e.id != id).cloned().collect();
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.entries.lock().await.len())
    }
}
