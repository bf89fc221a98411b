//! Walkthrough against the in-memory store.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use ticket_queue_core::{AdminSession, QueueSummary, SharedSecretGate, TicketState};
use ticket_queue_demo::DemoError;
use ticket_queue_testing::test_ledger;

#[tokio::test]
async fn walkthrough_reports_final_counts() {
    let (ledger, store) = test_ledger();
    let session = AdminSession::new(SharedSecretGate::new("Prueba123"));

    let summary = ticket_queue_demo::run(&ledger, &session, "Prueba123")
        .await
        .expect("walkthrough failed");

    assert_eq!(
        summary,
        QueueSummary {
            waiting: 1,
            in_progress: 1,
            done: 0,
        }
    );
    assert!(!session.is_authenticated());

    // Ana (#1) was removed, so Marta got #3 rather than reusing a number.
    assert_eq!(store.last_number(), 3);
    let numbers: Vec<u64> = ledger
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|t| t.number().get())
        .collect();
    assert_eq!(numbers, vec![2, 3]);

    let view = ledger.list_by_state().await.unwrap();
    assert_eq!(view.get(TicketState::InProgress)[0].holder_name(), "Luis");
}

#[tokio::test]
async fn wrong_admin_secret_stops_walkthrough() {
    let (ledger, _store) = test_ledger();
    let session = AdminSession::new(SharedSecretGate::new("Prueba123"));

    let result = ticket_queue_demo::run(&ledger, &session, "guess").await;

    assert!(matches!(result, Err(DemoError::AccessDenied)));
    assert!(!session.is_authenticated());
    // Public requests already went through before the admin step.
    assert_eq!(ledger.summary().await.unwrap().waiting, 2);
}
