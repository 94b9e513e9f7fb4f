use hostel_ledger::config::CONFIG;
use hostel_ledger::infrastructure::gateway::http::HttpGateway;
use hostel_ledger::infrastructure::notifications::LogNotifier;
use hostel_ledger::infrastructure::storage::json_file::JsonFileWriteLog;
use hostel_ledger::{ConnectivityMonitor, LedgerService, SyncOutcome};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(CONFIG.log_level.as_str())
        .init();
    info!("Starting with {:?}", *CONFIG);

    let log = JsonFileWriteLog::open(&CONFIG.queue_path, CONFIG.queue_capacity).await?;
    let gateway = HttpGateway::new(CONFIG.gateway_url.clone());
    let connectivity = Arc::new(ConnectivityMonitor::new(true));
    let ledger = LedgerService::new(log, gateway, LogNotifier, connectivity)
        .with_retry_policy(CONFIG.retry_policy());

    info!("{} expenses queued", ledger.pending_count().await?);
    match ledger.sync_on_startup().await {
        Ok(Some(SyncOutcome::Completed(report))) => {
            info!("Synced {}, failed {}", report.synced, report.failed)
        }
        Ok(Some(SyncOutcome::AlreadyRunning)) => info!("Sync already in progress"),
        Ok(None) => info!("Nothing to sync"),
        Err(e) => warn!("Start-up sync failed: {}", e),
    }

    Ok(())
}
