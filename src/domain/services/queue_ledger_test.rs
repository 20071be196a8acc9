#[cfg(test)]
mod tests {
    use crate::domain::models::business::{Business, BusinessCategory};
    use crate::domain::models::queue_entry::{QueueEntry, QueueStatus};
    use crate::domain::repositories::business_repository::{
        BusinessQueryParams, BusinessRepository, RepositoryError,
    };
    use crate::domain::repositories::queue_repository::{
        LedgerError, QueueQueryParams, QueueRepository,
    };
    use crate::domain::services::queue_ledger::QueueLedger;
    use async_trait::async_trait;
    use chrono::Utc;
    use sea_orm::DbErr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    /// Fails each mutating call a configured number of times with a
    /// transient error before letting it succeed.
    struct FlakyQueueRepository {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakyQueueRepository {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }

        fn try_take_failure(&self) -> Result<(), LedgerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(LedgerError::TransientStore(DbErr::Custom(
                    "deadlock detected".to_string(),
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl QueueRepository for FlakyQueueRepository {
        async fn join(
            &self,
            business_id: Uuid,
            user_id: Uuid,
        ) -> Result<QueueEntry, LedgerError> {
            self.try_take_failure()?;
            Ok(QueueEntry::new(business_id, user_id, 1, 10))
        }

        async fn leave(&self, _entry_id: Uuid, _user_id: Uuid) -> Result<(), LedgerError> {
            self.try_take_failure()
        }

        async fn advance(
            &self,
            _entry_id: Uuid,
            _to_status: QueueStatus,
        ) -> Result<QueueEntry, LedgerError> {
            self.try_take_failure()?;
            Err(LedgerError::NotFound)
        }

        async fn find_for_user(
            &self,
            _entry_id: Uuid,
            _user_id: Uuid,
        ) -> Result<Option<QueueEntry>, LedgerError> {
            Ok(None)
        }

        async fn list_for_user(
            &self,
            _params: QueueQueryParams,
        ) -> Result<(Vec<QueueEntry>, u64), LedgerError> {
            Ok((Vec::new(), 0))
        }

        async fn current_for_user(
            &self,
            _user_id: Uuid,
        ) -> Result<Option<QueueEntry>, LedgerError> {
            Ok(None)
        }

        async fn list_active_for_business(
            &self,
            _business_id: Uuid,
        ) -> Result<Vec<QueueEntry>, LedgerError> {
            Ok(Vec::new())
        }

        async fn update_notes(
            &self,
            _entry_id: Uuid,
            _user_id: Uuid,
            _notes: Option<String>,
        ) -> Result<QueueEntry, LedgerError> {
            Err(LedgerError::NotFound)
        }
    }

    struct SingleBusinessRepository {
        business: Business,
    }

    #[async_trait]
    impl BusinessRepository for SingleBusinessRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, RepositoryError> {
            if id == self.business.id {
                Ok(Some(self.business.clone()))
            } else {
                Ok(None)
            }
        }

        async fn list(
            &self,
            _params: BusinessQueryParams,
        ) -> Result<(Vec<Business>, u64), RepositoryError> {
            Ok((vec![self.business.clone()], 1))
        }

        async fn search(
            &self,
            _query: &str,
            _category: Option<BusinessCategory>,
            _limit: u64,
        ) -> Result<Vec<Business>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    fn business_with_queue(count: i32, average_wait: i32) -> Business {
        let now = Utc::now().into();
        Business {
            id: Uuid::new_v4(),
            name: "Cafe".to_string(),
            email: "cafe@example.com".to_string(),
            description: None,
            address: "2 Side St".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            phone_number: "+1 (555) 111-2222".to_string(),
            category: BusinessCategory::Cafe,
            images: serde_json::json!([]),
            average_wait_minutes: average_wait,
            current_queue_count: count,
            max_queue_capacity: 50,
            is_active: true,
            is_verified: true,
            operating_hours: serde_json::json!({}),
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn ledger_with(
        queue_repo: Arc<FlakyQueueRepository>,
        business: Business,
    ) -> QueueLedger {
        QueueLedger::new(
            queue_repo,
            Arc::new(SingleBusinessRepository { business }),
        )
    }

    #[tokio::test]
    async fn test_join_retries_transient_error_once() {
        let repo = Arc::new(FlakyQueueRepository::new(1));
        let business = business_with_queue(0, 10);
        let business_id = business.id;
        let ledger = ledger_with(repo.clone(), business);

        let entry = ledger.join(business_id, Uuid::new_v4()).await.unwrap();
        assert_eq!(entry.position, 1);
        assert_eq!(repo.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_join_gives_up_after_second_transient_failure() {
        let repo = Arc::new(FlakyQueueRepository::new(2));
        let business = business_with_queue(0, 10);
        let business_id = business.id;
        let ledger = ledger_with(repo.clone(), business);

        let result = ledger.join(business_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(LedgerError::TransientStore(_))));
        assert_eq!(repo.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_leave_retries_transient_error_once() {
        let repo = Arc::new(FlakyQueueRepository::new(1));
        let business = business_with_queue(0, 10);
        let ledger = ledger_with(repo.clone(), business);

        ledger.leave(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert_eq!(repo.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_estimate_is_pure_arithmetic_over_business_state() {
        let repo = Arc::new(FlakyQueueRepository::new(0));
        let business = business_with_queue(4, 10);
        let business_id = business.id;
        let ledger = ledger_with(repo, business);

        let estimate = ledger.estimate(business_id).await.unwrap();
        assert_eq!(estimate.next_position, 5);
        assert_eq!(estimate.estimated_wait_minutes, 50);

        let stats = ledger.stats(business_id).await.unwrap();
        assert_eq!(stats.current_queue_count, 4);
        assert_eq!(stats.max_queue_capacity, 50);
        assert!(stats.is_active);
    }
}
