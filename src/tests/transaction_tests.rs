use super::init_logger;
use crate::core::errors::LedgerError;
use crate::core::transaction::{TransactionManager, TransactionOperation, TransactionResult, TransactionState};
use std::sync::{Arc, Mutex};

type Journal = Arc<Mutex<Vec<String>>>;

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

fn step(name: &'static str, journal: &Journal, fails: bool) -> TransactionOperation<&'static str> {
    let forward = Arc::clone(journal);
    let backward = Arc::clone(journal);
    TransactionOperation::new(
        format!("step {}", name),
        move || {
            let journal = Arc::clone(&forward);
            async move {
                journal.lock().unwrap().push(format!("do {}", name));
                if fails {
                    Err(LedgerError::Remote(format!("{} failed", name)))
                } else {
                    Ok(name)
                }
            }
        },
        move || {
            let journal = Arc::clone(&backward);
            async move {
                journal.lock().unwrap().push(format!("undo {}", name));
                Ok(())
            }
        },
    )
}

#[tokio::test]
async fn commits_when_every_step_succeeds() {
    init_logger();
    let journal: Journal = Arc::default();
    let mut manager = TransactionManager::new();
    manager
        .add_operation(step("a", &journal, false))
        .add_operation(step("b", &journal, false));
    assert_eq!(manager.state(), TransactionState::Idle);

    let result = manager.execute().await;

    assert_eq!(result, TransactionResult::Committed(vec!["a", "b"]));
    assert_eq!(manager.state(), TransactionState::Committed);
    assert_eq!(entries(&journal), vec!["do a", "do b"]);
}

#[tokio::test]
async fn middle_failure_compensates_earlier_steps_only() {
    init_logger();
    let journal: Journal = Arc::default();
    let mut manager = TransactionManager::new();
    manager
        .add_operation(step("a", &journal, false))
        .add_operation(step("b", &journal, true))
        .add_operation(step("c", &journal, false));

    let result = manager.execute().await;

    assert!(!result.is_success());
    assert_eq!(result.error(), Some(&LedgerError::Remote("b failed".to_string())));
    assert_eq!(manager.state(), TransactionState::Failed);
    assert_eq!(entries(&journal), vec!["do a", "do b", "undo a"]);
}

#[tokio::test]
async fn compensation_runs_in_reverse_order() {
    let journal: Journal = Arc::default();
    let mut manager = TransactionManager::new();
    for (name, fails) in [("a", false), ("b", false), ("c", false), ("d", true)] {
        manager.add_operation(step(name, &journal, fails));
    }

    manager.execute().await;

    assert_eq!(
        entries(&journal),
        vec!["do a", "do b", "do c", "do d", "undo c", "undo b", "undo a"]
    );
}

#[tokio::test]
async fn failing_compensation_does_not_stop_the_rest() {
    init_logger();
    let journal: Journal = Arc::default();
    let mut manager = TransactionManager::new();
    manager.add_operation(step("a", &journal, false));
    manager.add_operation(TransactionOperation::new(
        "broken undo",
        || async { Ok("b") },
        || async { Err(LedgerError::Remote("undo b failed".to_string())) },
    ));
    manager.add_operation(step("c", &journal, true));

    let result = manager.execute().await;

    assert!(matches!(result, TransactionResult::Failed(LedgerError::Remote(_))));
    assert_eq!(entries(&journal), vec!["do a", "do c", "undo a"]);
}

#[tokio::test]
async fn clear_resets_for_reuse() {
    let journal: Journal = Arc::default();
    let mut manager = TransactionManager::new();
    manager.add_operation(step("a", &journal, true));
    manager.execute().await;

    manager.clear();
    assert!(manager.is_empty());
    assert_eq!(manager.state(), TransactionState::Idle);

    manager.add_operation(step("b", &journal, false));
    let result = manager.execute().await;
    assert_eq!(result.results(), Some(&["b"][..]));
}
