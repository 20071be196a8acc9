use crate::mock_store::MockStore;
use skipline::domain::models::queue_entry::QueueStatus;
use skipline::domain::repositories::business_repository::BusinessRepository;
use skipline::domain::repositories::queue_repository::{LedgerError, QueueRepository};
use skipline::domain::services::queue_ledger::QueueLedger;
use std::sync::Arc;
use uuid::Uuid;

fn ledger_over(store: &MockStore) -> QueueLedger {
    let queue_repo: Arc<dyn QueueRepository> = Arc::new(store.clone());
    let business_repo: Arc<dyn BusinessRepository> = Arc::new(store.clone());
    QueueLedger::new(queue_repo, business_repo)
}

#[tokio::test]
async fn test_join_leave_rejoin_scenario() {
    // Business with capacity 3 and a 10 minute average service time
    let store = MockStore::new();
    let business_id = store.add_business(3, 10, true).await;
    let ledger = ledger_over(&store);

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let user_c = Uuid::new_v4();
    let user_d = Uuid::new_v4();

    let entry_a = ledger.join(business_id, user_a).await.unwrap();
    assert_eq!(entry_a.position, 1);
    assert_eq!(entry_a.estimated_wait_minutes, 10);
    assert_eq!(entry_a.status, QueueStatus::Waiting);

    let entry_b = ledger.join(business_id, user_b).await.unwrap();
    assert_eq!(entry_b.position, 2);
    assert_eq!(entry_b.estimated_wait_minutes, 20);

    let entry_c = ledger.join(business_id, user_c).await.unwrap();
    assert_eq!(entry_c.position, 3);
    assert_eq!(entry_c.estimated_wait_minutes, 30);

    // Queue is at capacity now
    assert!(matches!(
        ledger.join(business_id, user_d).await,
        Err(LedgerError::Full)
    ));

    // A leaves, everyone behind shifts down one and re-estimates
    ledger.leave(entry_a.id, user_a).await.unwrap();

    let entry_b = ledger.get_for_user(entry_b.id, user_b).await.unwrap();
    assert_eq!(entry_b.position, 1);
    assert_eq!(entry_b.estimated_wait_minutes, 10);

    let entry_c = ledger.get_for_user(entry_c.id, user_c).await.unwrap();
    assert_eq!(entry_c.position, 2);
    assert_eq!(entry_c.estimated_wait_minutes, 20);

    store.assert_invariants(business_id).await;

    // The freed slot is admittable again
    let entry_d = ledger.join(business_id, user_d).await.unwrap();
    assert_eq!(entry_d.position, 3);
    assert_eq!(entry_d.estimated_wait_minutes, 30);

    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_concurrent_joins_respect_capacity() {
    let store = MockStore::new();
    let business_id = store.add_business(5, 10, true).await;
    let ledger = Arc::new(ledger_over(&store));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.join(business_id, Uuid::new_v4()).await
        }));
    }

    let mut admitted = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(LedgerError::Full) => full += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(full, 15);
    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_concurrent_join_and_leave_keep_positions_dense() {
    let store = MockStore::new();
    let business_id = store.add_business(50, 5, true).await;
    let ledger = Arc::new(ledger_over(&store));

    // Seed ten waiting users, then concurrently remove half while ten
    // more join
    let mut seeded = Vec::new();
    for _ in 0..10 {
        let user_id = Uuid::new_v4();
        let entry = ledger.join(business_id, user_id).await.unwrap();
        seeded.push((entry.id, user_id));
    }

    let mut handles = Vec::new();
    for (entry_id, user_id) in seeded.iter().take(5).cloned() {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.leave(entry_id, user_id).await.map(|_| ())
        }));
    }
    for _ in 0..10 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.join(business_id, Uuid::new_v4()).await.map(|_| ())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    store.assert_invariants(business_id).await;

    let active = ledger.list_active_for_business(business_id).await.unwrap();
    assert_eq!(active.len(), 15);
}

#[tokio::test]
async fn test_single_active_membership() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_id = Uuid::new_v4();
    let entry = ledger.join(business_id, user_id).await.unwrap();

    assert!(matches!(
        ledger.join(business_id, user_id).await,
        Err(LedgerError::Conflict)
    ));

    // Still blocked once notified, only a terminal state frees the user
    ledger
        .advance(entry.id, QueueStatus::Notified)
        .await
        .unwrap();
    assert!(matches!(
        ledger.join(business_id, user_id).await,
        Err(LedgerError::Conflict)
    ));

    ledger
        .advance(entry.id, QueueStatus::Completed)
        .await
        .unwrap();
    assert!(ledger.join(business_id, user_id).await.is_ok());

    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_advance_completed_frees_slot_and_compacts() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let entry_a = ledger.join(business_id, user_a).await.unwrap();
    let entry_b = ledger.join(business_id, user_b).await.unwrap();

    // Notify alone shifts nobody
    ledger
        .advance(entry_a.id, QueueStatus::Notified)
        .await
        .unwrap();
    let entry_b_after = ledger.get_for_user(entry_b.id, user_b).await.unwrap();
    assert_eq!(entry_b_after.position, 2);
    assert_eq!(
        ledger.stats(business_id).await.unwrap().current_queue_count,
        2
    );

    // Completion frees the slot and compacts the queue behind it
    let completed = ledger
        .advance(entry_a.id, QueueStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, QueueStatus::Completed);
    assert!(completed.completed_at.is_some());

    let entry_b_after = ledger.get_for_user(entry_b.id, user_b).await.unwrap();
    assert_eq!(entry_b_after.position, 1);
    assert_eq!(entry_b_after.estimated_wait_minutes, 10);
    assert_eq!(
        ledger.stats(business_id).await.unwrap().current_queue_count,
        1
    );

    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_no_show_frees_slot() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let entry_a = ledger.join(business_id, user_a).await.unwrap();
    let entry_b = ledger.join(business_id, user_b).await.unwrap();

    ledger
        .advance(entry_a.id, QueueStatus::NoShow)
        .await
        .unwrap();

    let entry_b = ledger.get_for_user(entry_b.id, user_b).await.unwrap();
    assert_eq!(entry_b.position, 1);
    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_terminal_entries_are_immutable() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_id = Uuid::new_v4();
    let entry = ledger.join(business_id, user_id).await.unwrap();
    ledger.leave(entry.id, user_id).await.unwrap();

    // Every further mutation must fail without touching state
    assert!(matches!(
        ledger.leave(entry.id, user_id).await,
        Err(LedgerError::InvalidState)
    ));
    for target in [
        QueueStatus::Notified,
        QueueStatus::Completed,
        QueueStatus::NoShow,
    ] {
        assert!(matches!(
            ledger.advance(entry.id, target).await,
            Err(LedgerError::InvalidState)
        ));
    }

    let after = ledger.get_for_user(entry.id, user_id).await.unwrap();
    assert_eq!(after.status, QueueStatus::Cancelled);
    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_leave_requires_waiting_status() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_id = Uuid::new_v4();
    let entry = ledger.join(business_id, user_id).await.unwrap();
    ledger
        .advance(entry.id, QueueStatus::Notified)
        .await
        .unwrap();

    assert!(matches!(
        ledger.leave(entry.id, user_id).await,
        Err(LedgerError::InvalidState)
    ));
}

#[tokio::test]
async fn test_leave_is_owner_only() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let entry = ledger.join(business_id, owner).await.unwrap();

    assert!(matches!(
        ledger.leave(entry.id, stranger).await,
        Err(LedgerError::NotFound)
    ));
}

#[tokio::test]
async fn test_inactive_and_missing_business() {
    let store = MockStore::new();
    let inactive_id = store.add_business(10, 10, false).await;
    let ledger = ledger_over(&store);

    assert!(matches!(
        ledger.join(inactive_id, Uuid::new_v4()).await,
        Err(LedgerError::Inactive)
    ));
    assert!(matches!(
        ledger.join(Uuid::new_v4(), Uuid::new_v4()).await,
        Err(LedgerError::NotFound)
    ));
    assert!(matches!(
        ledger.estimate(Uuid::new_v4()).await,
        Err(LedgerError::NotFound)
    ));
}

#[tokio::test]
async fn test_estimate_tracks_queue_depth() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 15, true).await;
    let ledger = ledger_over(&store);

    let estimate = ledger.estimate(business_id).await.unwrap();
    assert_eq!(estimate.next_position, 1);
    assert_eq!(estimate.estimated_wait_minutes, 15);

    ledger.join(business_id, Uuid::new_v4()).await.unwrap();
    ledger.join(business_id, Uuid::new_v4()).await.unwrap();

    let estimate = ledger.estimate(business_id).await.unwrap();
    assert_eq!(estimate.next_position, 3);
    assert_eq!(estimate.estimated_wait_minutes, 45);
}

#[tokio::test]
async fn test_notes_update_does_not_touch_positions() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_id = Uuid::new_v4();
    let entry = ledger.join(business_id, user_id).await.unwrap();

    let updated = ledger
        .update_notes(entry.id, user_id, Some("Window seat please".to_string()))
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Window seat please"));
    assert_eq!(updated.position, entry.position);

    // Notes stay editable after the entry is terminal
    ledger.leave(entry.id, user_id).await.unwrap();
    let updated = ledger
        .update_notes(entry.id, user_id, Some("Never mind".to_string()))
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Never mind"));

    store.assert_invariants(business_id).await;
}

#[tokio::test]
async fn test_current_and_listing_accessors() {
    let store = MockStore::new();
    let business_id = store.add_business(10, 10, true).await;
    let ledger = ledger_over(&store);

    let user_id = Uuid::new_v4();
    assert!(ledger.current_for_user(user_id).await.unwrap().is_none());

    let entry = ledger.join(business_id, user_id).await.unwrap();
    let current = ledger.current_for_user(user_id).await.unwrap().unwrap();
    assert_eq!(current.id, entry.id);

    ledger.leave(entry.id, user_id).await.unwrap();
    assert!(ledger.current_for_user(user_id).await.unwrap().is_none());

    // History keeps the cancelled entry
    let (history, total) = ledger
        .list_for_user(skipline::domain::repositories::queue_repository::QueueQueryParams {
            user_id,
            status: None,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(history[0].status, QueueStatus::Cancelled);
}
