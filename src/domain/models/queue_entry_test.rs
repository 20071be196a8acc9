#[cfg(test)]
mod tests {
    use crate::domain::models::queue_entry::{
        estimated_wait, next_position, QueueEntry, QueueStatus,
    };
    use uuid::Uuid;

    fn waiting_entry(position: i32) -> QueueEntry {
        QueueEntry::new(Uuid::new_v4(), Uuid::new_v4(), position, 10)
    }

    #[test]
    fn test_new_entry_is_waiting_with_estimate() {
        let entry = waiting_entry(3);
        assert_eq!(entry.status, QueueStatus::Waiting);
        assert_eq!(entry.position, 3);
        assert_eq!(entry.estimated_wait_minutes, 30);
        assert!(entry.notified_at.is_none());
        assert!(entry.completed_at.is_none());
        assert!(entry.cancelled_at.is_none());
    }

    #[test]
    fn test_position_and_wait_math() {
        assert_eq!(next_position(0), 1);
        assert_eq!(next_position(7), 8);
        assert_eq!(estimated_wait(1, 10), 10);
        assert_eq!(estimated_wait(4, 15), 60);
        assert_eq!(estimated_wait(0, 10), 0);
    }

    #[test]
    fn test_waiting_to_notified_to_completed() {
        let entry = waiting_entry(1).notify().unwrap();
        assert_eq!(entry.status, QueueStatus::Notified);
        assert!(entry.notified_at.is_some());

        let entry = entry.complete().unwrap();
        assert_eq!(entry.status, QueueStatus::Completed);
        assert!(entry.completed_at.is_some());
    }

    #[test]
    fn test_waiting_can_cancel_notified_cannot() {
        let entry = waiting_entry(1).cancel().unwrap();
        assert_eq!(entry.status, QueueStatus::Cancelled);
        assert!(entry.cancelled_at.is_some());

        let notified = waiting_entry(1).notify().unwrap();
        assert!(notified.cancel().is_err());
    }

    #[test]
    fn test_no_show_from_waiting_and_notified() {
        let entry = waiting_entry(1).no_show().unwrap();
        assert_eq!(entry.status, QueueStatus::NoShow);

        let entry = waiting_entry(1).notify().unwrap().no_show().unwrap();
        assert_eq!(entry.status, QueueStatus::NoShow);
    }

    #[test]
    fn test_completed_cannot_be_skipped() {
        // complete is only reachable from notified
        assert!(waiting_entry(1).complete().is_err());
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        let cancelled = waiting_entry(1).cancel().unwrap();
        assert!(cancelled.clone().notify().is_err());
        assert!(cancelled.clone().complete().is_err());
        assert!(cancelled.clone().no_show().is_err());
        assert!(cancelled.cancel().is_err());

        let completed = waiting_entry(1).notify().unwrap().complete().unwrap();
        assert!(completed.clone().notify().is_err());
        assert!(completed.clone().no_show().is_err());
        assert!(completed.cancel().is_err());

        let no_show = waiting_entry(1).no_show().unwrap();
        assert!(no_show.clone().notify().is_err());
        assert!(no_show.complete().is_err());
    }

    #[test]
    fn test_advance_to_rejects_non_advance_targets() {
        assert!(waiting_entry(1).advance_to(QueueStatus::Waiting).is_err());
        assert!(waiting_entry(1).advance_to(QueueStatus::Cancelled).is_err());
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            QueueStatus::Waiting,
            QueueStatus::Notified,
            QueueStatus::Completed,
            QueueStatus::Cancelled,
            QueueStatus::NoShow,
        ] {
            assert_eq!(status.to_string().parse::<QueueStatus>(), Ok(status));
        }
        assert!("unknown".parse::<QueueStatus>().is_err());
    }

    #[test]
    fn test_active_and_terminal_classification() {
        assert!(QueueStatus::Waiting.is_active());
        assert!(QueueStatus::Notified.is_active());
        assert!(!QueueStatus::Completed.is_active());
        assert!(QueueStatus::Completed.is_terminal());
        assert!(QueueStatus::Cancelled.is_terminal());
        assert!(QueueStatus::NoShow.is_terminal());
        assert!(!QueueStatus::Waiting.is_terminal());
    }
}
