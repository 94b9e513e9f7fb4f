use crate::core::errors::LedgerError;
use crate::core::models::{ExpenseDraft, Notice, QueuedExpense};
use crate::core::retry::{RetryPolicy, retry_operation};
use crate::core::sync::{SyncOutcome, SyncSubscription, Synchronizer};
use crate::core::transaction::{TransactionManager, TransactionOperation, TransactionResult};
use crate::infrastructure::connectivity::ConnectivityMonitor;
use crate::infrastructure::gateway::RemoteGateway;
use crate::infrastructure::notifications::Notifier;
use crate::infrastructure::storage::WriteLog;
use log::{debug, error, info};
use std::sync::{Arc, OnceLock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Accepted by the remote store.
    Created { expense_id: Option<String> },
    /// Saved locally; will be sent by the next sync pass.
    Queued { id: String },
}

/// A completed step of `record_expense_with_balances`.
#[derive(Clone, Debug, PartialEq)]
pub enum LedgerWrite {
    ExpenseCreated(String),
    BalanceAdjusted {
        debtor: String,
        creditor: String,
        amount: f64,
    },
}

pub struct LedgerService<W: WriteLog, G: RemoteGateway, N: Notifier> {
    log: Arc<W>,
    gateway: Arc<G>,
    notifier: Arc<N>,
    connectivity: Arc<ConnectivityMonitor>,
    synchronizer: Arc<Synchronizer<W, G, N>>,
    retry_policy: RetryPolicy,
}

impl<W, G, N> LedgerService<W, G, N>
where
    W: WriteLog + 'static,
    G: RemoteGateway + 'static,
    N: Notifier + 'static,
{
    pub fn new(log: W, gateway: G, notifier: N, connectivity: Arc<ConnectivityMonitor>) -> Self {
        info!("Initializing LedgerService");
        let log = Arc::new(log);
        let gateway = Arc::new(gateway);
        let notifier = Arc::new(notifier);
        let synchronizer = Arc::new(Synchronizer::new(
            Arc::clone(&log),
            Arc::clone(&gateway),
            Arc::clone(&notifier),
        ));
        LedgerService {
            log,
            gateway,
            notifier,
            connectivity,
            synchronizer,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn write_log(&self) -> &W {
        &self.log
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub fn synchronizer(&self) -> &Arc<Synchronizer<W, G, N>> {
        &self.synchronizer
    }

    /// Wires reconnect-triggered sync passes and the offline notice.
    pub fn attach_connectivity(&self) -> Result<SyncSubscription, LedgerError> {
        self.synchronizer.attach(&self.connectivity)
    }

    pub async fn submit_expense(&self, draft: ExpenseDraft) -> Result<Submission, LedgerError> {
        draft.validate()?;

        if !self.connectivity.is_online() {
            return self.queue_expense(draft).await;
        }

        info!("Submitting expense for group {}", draft.group_id);
        let gateway = Arc::clone(&self.gateway);
        let expense_id = retry_operation(self.retry_policy, || {
            let gateway = Arc::clone(&gateway);
            let draft = draft.clone();
            async move { gateway.create_expense(&draft).await?.into_result() }
        })
        .await?;
        debug!("Expense created remotely: {:?}", expense_id);
        Ok(Submission::Created { expense_id })
    }

    async fn queue_expense(&self, draft: ExpenseDraft) -> Result<Submission, LedgerError> {
        let queued = QueuedExpense::new(draft);
        let id = queued.id.clone();
        if let Err(e) = self.log.enqueue(queued).await {
            error!("Could not save expense locally: {}", e);
            self.notifier.notify(Notice::SaveFailed);
            return Err(match e {
                LedgerError::StorageUnavailable(_) => e,
                other => LedgerError::StorageUnavailable(other.to_string()),
            });
        }
        info!("Offline: queued expense {}", id);
        Ok(Submission::Queued { id })
    }

    /// Creates the expense and moves every non-payer participant's share onto
    /// their balance with the payer. Earlier steps are compensated if a later
    /// one fails.
    pub async fn record_expense_with_balances(
        &self,
        draft: ExpenseDraft,
    ) -> Result<TransactionResult<LedgerWrite>, LedgerError> {
        draft.validate()?;
        let mut manager = TransactionManager::new();

        let created: Arc<OnceLock<String>> = Arc::new(OnceLock::new());
        let (gateway, payload, slot) = (Arc::clone(&self.gateway), draft.clone(), Arc::clone(&created));
        let (undo_gateway, undo_slot) = (Arc::clone(&self.gateway), Arc::clone(&created));
        manager.add_operation(TransactionOperation::new(
            format!("create expense in group {}", draft.group_id),
            move || {
                let (gateway, payload, slot) = (Arc::clone(&gateway), payload.clone(), Arc::clone(&slot));
                async move {
                    // Without an id the expense cannot be compensated, so no balances may follow it.
                    let Some(expense_id) = gateway.create_expense(&payload).await?.into_result()? else {
                        error!(
                            "Expense in group {} created without an id; it cannot be rolled back",
                            payload.group_id
                        );
                        return Err(LedgerError::Remote("create reply carried no expense id".to_string()));
                    };
                    let _ = slot.set(expense_id.clone());
                    Ok(LedgerWrite::ExpenseCreated(expense_id))
                }
            },
            move || {
                let (gateway, slot) = (Arc::clone(&undo_gateway), Arc::clone(&undo_slot));
                async move {
                    match slot.get() {
                        Some(id) => gateway.delete_expense(id).await,
                        None => Err(LedgerError::Remote("no remote expense id recorded".to_string())),
                    }
                }
            },
        ));

        for share in draft.participants.iter().filter(|s| s.participant_id != draft.paid_by) {
            let group = draft.group_id.clone();
            let debtor = share.participant_id.clone();
            let creditor = draft.paid_by.clone();
            let amount = share.amount;
            let forward = (Arc::clone(&self.gateway), group.clone(), debtor.clone(), creditor.clone());
            let backward = (Arc::clone(&self.gateway), group, debtor.clone(), creditor.clone());

            manager.add_operation(TransactionOperation::new(
                format!("{} owes {} {:.2}", debtor, creditor, amount),
                move || {
                    let (gateway, group, debtor, creditor) = forward.clone();
                    async move {
                        gateway.adjust_balance(&group, &debtor, &creditor, amount).await?;
                        Ok(LedgerWrite::BalanceAdjusted {
                            debtor,
                            creditor,
                            amount,
                        })
                    }
                },
                move || {
                    let (gateway, group, debtor, creditor) = backward.clone();
                    async move { gateway.adjust_balance(&group, &debtor, &creditor, -amount).await }
                },
            ));
        }

        Ok(manager.execute().await)
    }

    /// Start-up trigger: runs a pass only when online with something queued.
    pub async fn sync_on_startup(&self) -> Result<Option<SyncOutcome>, LedgerError> {
        if !self.connectivity.is_online() || self.log.count().await? == 0 {
            return Ok(None);
        }
        self.synchronizer.sync_pending().await.map(Some)
    }

    /// User-initiated retry.
    pub async fn retry_sync(&self) -> Result<Option<SyncOutcome>, LedgerError> {
        if !self.connectivity.is_online() {
            self.notifier.notify(Notice::Offline);
            return Ok(None);
        }
        self.synchronizer.sync_pending().await.map(Some)
    }

    pub async fn pending_count(&self) -> Result<usize, LedgerError> {
        self.log.count().await
    }
}
