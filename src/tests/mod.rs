mod retry_tests;
mod transaction_tests;

use crate::core::models::{ExpenseDraft, ParticipantShare, QueuedExpense};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn draft(note: &str) -> ExpenseDraft {
    ExpenseDraft {
        group_id: "room-12".to_string(),
        amount: 90.0,
        paid_by: "alice".to_string(),
        participants: vec![
            ParticipantShare::new("alice", 30.0),
            ParticipantShare::new("bob", 30.0),
            ParticipantShare::new("carol", 30.0),
        ],
        note: Some(note.to_string()),
        place: None,
    }
}

pub fn queued(note: &str) -> QueuedExpense {
    QueuedExpense::new(draft(note))
}
