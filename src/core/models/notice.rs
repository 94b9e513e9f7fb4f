use serde::Serialize;

/// Toast-style messages surfaced to the user.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Notice {
    Synced(usize),
    SyncFailed(usize),
    Offline,
    SaveFailed,
    /// The write log could not be read, so no pass ran.
    QueueUnavailable,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Synced(1) => write!(f, "1 expense synced"),
            Notice::Synced(n) => write!(f, "{} expenses synced", n),
            Notice::SyncFailed(1) => write!(f, "1 expense failed to sync, will retry"),
            Notice::SyncFailed(n) => write!(f, "{} expenses failed to sync, will retry", n),
            Notice::Offline => write!(f, "You are offline. Expenses will be saved locally"),
            Notice::SaveFailed => write!(f, "Could not save expense locally"),
            Notice::QueueUnavailable => write!(f, "Could not read saved expenses, will retry"),
        }
    }
}
