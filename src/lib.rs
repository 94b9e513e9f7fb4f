pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LedgerError;
pub use crate::core::models::{ExpenseDraft, Notice, ParticipantShare, QueuedExpense};
pub use crate::core::retry::{RetryPolicy, retry_operation};
pub use crate::core::services::{LedgerService, LedgerWrite, Submission};
pub use crate::core::sync::{SyncOutcome, SyncReport, Synchronizer};
pub use crate::core::transaction::{TransactionManager, TransactionOperation, TransactionResult, TransactionState};
pub use infrastructure::connectivity::{ConnectivityMonitor, ListenerHandle};

#[cfg(test)]
mod tests;
