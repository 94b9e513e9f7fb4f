use crate::core::errors::LedgerError;
use crate::core::models::{Notice, QueuedExpense};
use crate::infrastructure::connectivity::{ConnectivityMonitor, ListenerHandle};
use crate::infrastructure::gateway::RemoteGateway;
use crate::infrastructure::notifications::Notifier;
use crate::infrastructure::storage::WriteLog;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Mutex;

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// Another pass held the slot; this trigger was dropped.
    AlreadyRunning,
}

impl SyncOutcome {
    pub fn report(&self) -> Option<SyncReport> {
        match self {
            SyncOutcome::Completed(report) => Some(*report),
            SyncOutcome::AlreadyRunning => None,
        }
    }
}

/// Drains the write log into the remote gateway.
///
/// At most one pass runs at a time. A pass replays a snapshot of the log
/// sequentially; entries enqueued meanwhile wait for the next pass. Failed
/// entries stay queued and are retried on the next trigger, with no backoff.
/// Replays are at-least-once: an entry whose remote create succeeded but whose
/// local removal did not will be sent again.
pub struct Synchronizer<W: WriteLog, G: RemoteGateway, N: Notifier> {
    log: Arc<W>,
    gateway: Arc<G>,
    notifier: Arc<N>,
    in_flight: Mutex<()>,
}

impl<W: WriteLog, G: RemoteGateway, N: Notifier> Synchronizer<W, G, N> {
    pub fn new(log: Arc<W>, gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Synchronizer {
            log,
            gateway,
            notifier,
            in_flight: Mutex::new(()),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub async fn sync_pending(&self) -> Result<SyncOutcome, LedgerError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Sync pass already in flight, ignoring trigger");
            return Ok(SyncOutcome::AlreadyRunning);
        };

        let pending = match self.log.list_all().await {
            Ok(pending) => pending,
            Err(e) => {
                error!("Could not read the write log: {}", e);
                self.notifier.notify(Notice::QueueUnavailable);
                return Err(e);
            }
        };
        if pending.is_empty() {
            return Ok(SyncOutcome::Completed(SyncReport::default()));
        }
        info!("Syncing {} queued expenses", pending.len());

        let mut report = SyncReport::default();
        for expense in &pending {
            match self.replay(expense).await {
                Ok(()) => {
                    report.synced += 1;
                    if let Err(e) = self.log.remove(&expense.id).await {
                        error!(
                            "Expense {} synced but could not be removed from the log: {}",
                            expense.id, e
                        );
                    }
                }
                Err(e) => {
                    warn!("Failed to sync expense {}: {}", expense.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Sync pass finished: {} synced, {} failed",
            report.synced, report.failed
        );
        if report.synced > 0 {
            self.notifier.notify(Notice::Synced(report.synced));
        }
        if report.failed > 0 {
            self.notifier.notify(Notice::SyncFailed(report.failed));
        }
        Ok(SyncOutcome::Completed(report))
    }

    async fn replay(&self, expense: &QueuedExpense) -> Result<(), LedgerError> {
        let response = self.gateway.create_expense(&expense.draft()).await?;
        let remote_id = response.into_result()?;
        debug!("Expense {} accepted as {:?}", expense.id, remote_id);
        Ok(())
    }
}

impl<W, G, N> Synchronizer<W, G, N>
where
    W: WriteLog + 'static,
    G: RemoteGateway + 'static,
    N: Notifier + 'static,
{
    /// Starts a pass whenever the monitor reports a return to online, and
    /// raises the offline notice when the connection drops. Passes are spawned
    /// on the runtime this is called from.
    pub fn attach(self: &Arc<Self>, monitor: &ConnectivityMonitor) -> Result<SyncSubscription, LedgerError> {
        let runtime = Handle::try_current()
            .map_err(|e| LedgerError::UnexpectedError(format!("no tokio runtime: {}", e)))?;

        let sync = Arc::clone(self);
        let online = monitor.on_online(move || {
            let sync = Arc::clone(&sync);
            runtime.spawn(async move {
                if let Err(e) = sync.sync_pending().await {
                    error!("Reconnect sync failed: {}", e);
                }
            });
        });

        let notifier = Arc::clone(&self.notifier);
        let offline = monitor.on_offline(move || notifier.notify(Notice::Offline));

        Ok(SyncSubscription {
            _online: online,
            _offline: offline,
        })
    }
}

/// Connectivity listeners installed by `Synchronizer::attach`.
#[must_use = "dropping the subscription detaches the synchronizer"]
pub struct SyncSubscription {
    _online: ListenerHandle,
    _offline: ListenerHandle,
}
