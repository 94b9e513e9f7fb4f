use crate::core::models::Notice;
use crate::infrastructure::notifications::Notifier;
use std::sync::Mutex;

pub struct InMemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        InMemoryNotifier {
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice);
    }
}
