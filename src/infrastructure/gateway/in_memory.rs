use crate::core::errors::LedgerError;
use crate::core::models::{CreateExpenseResponse, ExpenseDraft};
use crate::infrastructure::gateway::RemoteGateway;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

type BalanceKey = (String, String, String); // (group, debtor, creditor)

pub struct InMemoryGateway {
    expenses: Mutex<Vec<(String, ExpenseDraft)>>,
    balances: Mutex<HashMap<BalanceKey, f64>>,
    rejected_notes: Mutex<HashSet<String>>,
    failing_debtors: Mutex<HashSet<String>>,
    unreachable: AtomicBool,
    create_calls: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        InMemoryGateway {
            expenses: Mutex::new(Vec::new()),
            balances: Mutex::new(HashMap::new()),
            rejected_notes: Mutex::new(HashSet::new()),
            failing_debtors: Mutex::new(HashSet::new()),
            unreachable: AtomicBool::new(false),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Replies `success: false` to any draft carrying this note.
    pub async fn reject_note(&self, note: &str) {
        self.rejected_notes.lock().await.insert(note.to_string());
    }

    /// Fails balance adjustments where `debtor` owes.
    pub async fn fail_balance_for(&self, debtor: &str) {
        self.failing_debtors.lock().await.insert(debtor.to_string());
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub async fn expenses(&self) -> Vec<ExpenseDraft> {
        self.expenses.lock().await.iter().map(|(_, e)| e.clone()).collect()
    }

    pub async fn balance(&self, group_id: &str, debtor: &str, creditor: &str) -> f64 {
        self.balances
            .lock()
            .await
            .get(&(group_id.to_string(), debtor.to_string(), creditor.to_string()))
            .copied()
            .unwrap_or(0.0)
    }

    fn check_reachable(&self) -> Result<(), LedgerError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LedgerError::Remote("network unreachable".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn create_expense(&self, expense: &ExpenseDraft) -> Result<CreateExpenseResponse, LedgerError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if let Some(note) = &expense.note {
            if self.rejected_notes.lock().await.contains(note) {
                return Ok(CreateExpenseResponse::rejected(format!("rejected: {}", note)));
            }
        }
        let id = Uuid::new_v4().to_string();
        self.expenses.lock().await.push((id.clone(), expense.clone()));
        Ok(CreateExpenseResponse::created(id))
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<(), LedgerError> {
        self.check_reachable()?;
        let mut expenses = self.expenses.lock().await;
        let before = expenses.len();
        expenses.retain(|(id, _)| id != expense_id);
        if expenses.len() == before {
            return Err(LedgerError::NotFound(format!("Expense {}", expense_id)));
        }
        Ok(())
    }

    async fn adjust_balance(
        &self,
        group_id: &str,
        debtor: &str,
        creditor: &str,
        delta: f64,
    ) -> Result<(), LedgerError> {
        self.check_reachable()?;
        if self.failing_debtors.lock().await.contains(debtor) {
            return Err(LedgerError::Remote(format!("balance update for {} failed", debtor)));
        }
        let mut balances = self.balances.lock().await;
        let entry = balances
            .entry((group_id.to_string(), debtor.to_string(), creditor.to_string()))
            .or_insert(0.0);
        *entry += delta;
        Ok(())
    }
}
