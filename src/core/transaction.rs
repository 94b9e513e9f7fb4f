use crate::core::errors::LedgerError;
use futures::future::{BoxFuture, FutureExt};
use log::{debug, error, info, warn};
use std::future::Future;

type Action<T> = Box<dyn FnMut() -> BoxFuture<'static, Result<T, LedgerError>> + Send>;
type Compensation = Box<dyn FnMut() -> BoxFuture<'static, Result<(), LedgerError>> + Send>;

/// One forward step and the action that undoes it.
///
/// The compensating action must tolerate a forward step that only partially
/// applied.
pub struct TransactionOperation<T> {
    description: String,
    execute: Action<T>,
    rollback: Compensation,
}

impl<T: 'static> TransactionOperation<T> {
    pub fn new<E, EFut, R, RFut>(description: impl Into<String>, mut execute: E, mut rollback: R) -> Self
    where
        E: FnMut() -> EFut + Send + 'static,
        EFut: Future<Output = Result<T, LedgerError>> + Send + 'static,
        R: FnMut() -> RFut + Send + 'static,
        RFut: Future<Output = Result<(), LedgerError>> + Send + 'static,
    {
        TransactionOperation {
            description: description.into(),
            execute: Box::new(move || execute().boxed()),
            rollback: Box::new(move || rollback().boxed()),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<T> std::fmt::Debug for TransactionOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionOperation")
            .field("description", &self.description)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Executing,
    Committed,
    RollingBack,
    Failed,
}

#[derive(Debug, PartialEq)]
pub enum TransactionResult<T> {
    Committed(Vec<T>),
    /// Forward execution stopped; compensation was attempted on a best-effort basis.
    Failed(LedgerError),
}

impl<T> TransactionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionResult::Committed(_))
    }

    pub fn results(&self) -> Option<&[T]> {
        match self {
            TransactionResult::Committed(results) => Some(results),
            TransactionResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&LedgerError> {
        match self {
            TransactionResult::Committed(_) => None,
            TransactionResult::Failed(e) => Some(e),
        }
    }
}

/// Runs remote writes in order and compensates completed ones if a later write fails.
/// There is no commit protocol against the remote store: a failed compensation is
/// logged and the remaining compensations still run.
pub struct TransactionManager<T> {
    operations: Vec<TransactionOperation<T>>,
    state: TransactionState,
}

impl<T: Send + 'static> TransactionManager<T> {
    pub fn new() -> Self {
        TransactionManager {
            operations: Vec::new(),
            state: TransactionState::Idle,
        }
    }

    pub fn add_operation(&mut self, operation: TransactionOperation<T>) -> &mut Self {
        self.operations.push(operation);
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub async fn execute(&mut self) -> TransactionResult<T> {
        self.state = TransactionState::Executing;
        info!("Executing transaction with {} operations", self.operations.len());

        let mut results = Vec::with_capacity(self.operations.len());
        let mut failure = None;

        for (index, operation) in self.operations.iter_mut().enumerate() {
            debug!("Executing operation {}: {}", index, operation.description);
            match (operation.execute)().await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Operation '{}' failed: {}", operation.description, e);
                    failure = Some((index, e));
                    break;
                }
            }
        }

        let Some((failed_at, error)) = failure else {
            self.state = TransactionState::Committed;
            return TransactionResult::Committed(results);
        };

        self.state = TransactionState::RollingBack;
        for operation in self.operations[..failed_at].iter_mut().rev() {
            debug!("Rolling back: {}", operation.description);
            if let Err(e) = (operation.rollback)().await {
                error!("Rollback of '{}' failed: {}", operation.description, e);
            }
        }

        self.state = TransactionState::Failed;
        TransactionResult::Failed(error)
    }

    pub fn clear(&mut self) {
        self.operations.clear();
        self.state = TransactionState::Idle;
    }
}

impl<T: Send + 'static> Default for TransactionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
