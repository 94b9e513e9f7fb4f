pub mod http;
pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::{CreateExpenseResponse, ExpenseDraft};
use async_trait::async_trait;

/// Remote document store holding group expenses and settlement balances.
///
/// Creates are not idempotent: replaying the same draft records it twice.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn create_expense(&self, expense: &ExpenseDraft) -> Result<CreateExpenseResponse, LedgerError>;
    async fn delete_expense(&self, expense_id: &str) -> Result<(), LedgerError>;
    /// Adds `delta` to what `debtor` owes `creditor` within `group_id`.
    async fn adjust_balance(
        &self,
        group_id: &str,
        debtor: &str,
        creditor: &str,
        delta: f64,
    ) -> Result<(), LedgerError>;
}
