pub mod in_memory;

use crate::core::models::Notice;
use log::{info, warn};

/// Sink for user-facing toast messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log. Used where no UI is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Synced(_) => info!("{}", notice),
            Notice::SyncFailed(_) | Notice::Offline | Notice::SaveFailed | Notice::QueueUnavailable => {
                warn!("{}", notice)
            }
        }
    }
}
