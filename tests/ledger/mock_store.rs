use async_trait::async_trait;
use chrono::Utc;
use skipline::domain::models::business::{Business, BusinessCategory};
use skipline::domain::models::queue_entry::{
    estimated_wait, next_position, QueueEntry, QueueStatus,
};
use skipline::domain::repositories::business_repository::{
    BusinessQueryParams, BusinessRepository, RepositoryError,
};
use skipline::domain::repositories::queue_repository::{
    LedgerError, QueueQueryParams, QueueRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Shared in-memory state standing in for the relational store. The
/// mutex plays the role of the business row lock: every mutating
/// operation holds it for its whole critical section, which is exactly
/// the serialization the SQL implementation gets from FOR UPDATE.
pub struct StoreState {
    pub businesses: HashMap<Uuid, Business>,
    pub entries: Vec<QueueEntry>,
}

#[derive(Clone)]
pub struct MockStore {
    pub state: Arc<Mutex<StoreState>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                businesses: HashMap::new(),
                entries: Vec::new(),
            })),
        }
    }

    pub async fn add_business(&self, capacity: i32, average_wait: i32, is_active: bool) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now().into();
        let business = Business {
            id,
            name: "Test Business".to_string(),
            email: format!("{}@example.com", id),
            description: None,
            address: "1 Test St".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            phone_number: "+1 (555) 000-0000".to_string(),
            category: BusinessCategory::Restaurant,
            images: serde_json::json!([]),
            average_wait_minutes: average_wait,
            current_queue_count: 0,
            max_queue_capacity: capacity,
            is_active,
            is_verified: true,
            operating_hours: serde_json::json!({}),
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.businesses.insert(id, business);
        id
    }

    /// Assert the ledger invariants for one business: active positions
    /// are exactly {1..=count} and the cached count matches.
    pub async fn assert_invariants(&self, business_id: Uuid) {
        let state = self.state.lock().await;
        let business = state.businesses.get(&business_id).expect("business exists");

        let mut positions: Vec<i32> = state
            .entries
            .iter()
            .filter(|e| e.business_id == business_id && e.status.is_active())
            .map(|e| e.position)
            .collect();
        positions.sort_unstable();

        assert_eq!(
            business.current_queue_count as usize,
            positions.len(),
            "cached count must equal active entry count"
        );
        let expected: Vec<i32> = (1..=business.current_queue_count).collect();
        assert_eq!(positions, expected, "active positions must be dense 1..=N");
    }
}

#[async_trait]
impl QueueRepository for MockStore {
    async fn join(&self, business_id: Uuid, user_id: Uuid) -> Result<QueueEntry, LedgerError> {
        let mut state = self.state.lock().await;

        let business = state
            .businesses
            .get(&business_id)
            .ok_or(LedgerError::NotFound)?
            .clone();

        if !business.is_active {
            return Err(LedgerError::Inactive);
        }

        let already_active = state.entries.iter().any(|e| {
            e.business_id == business_id && e.user_id == user_id && e.status.is_active()
        });
        if already_active {
            return Err(LedgerError::Conflict);
        }

        if business.current_queue_count >= business.max_queue_capacity {
            return Err(LedgerError::Full);
        }

        let entry = QueueEntry::new(
            business_id,
            user_id,
            next_position(business.current_queue_count),
            business.average_wait_minutes,
        );
        state.entries.push(entry.clone());
        let business = state.businesses.get_mut(&business_id).unwrap();
        business.current_queue_count += 1;

        Ok(entry)
    }

    async fn leave(&self, entry_id: Uuid, user_id: Uuid) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;

        let index = state
            .entries
            .iter()
            .position(|e| e.id == entry_id && e.user_id == user_id)
            .ok_or(LedgerError::NotFound)?;

        let entry = state.entries[index].clone();
        let business_id = entry.business_id;
        let removed_position = entry.position;
        let cancelled = entry.cancel().map_err(|_| LedgerError::InvalidState)?;
        state.entries[index] = cancelled;

        let average_wait = state
            .businesses
            .get(&business_id)
            .ok_or(LedgerError::NotFound)?
            .average_wait_minutes;

        for entry in state.entries.iter_mut() {
            if entry.business_id == business_id
                && entry.status.is_active()
                && entry.position > removed_position
            {
                entry.position -= 1;
                entry.estimated_wait_minutes = estimated_wait(entry.position, average_wait);
            }
        }

        let business = state.businesses.get_mut(&business_id).unwrap();
        business.current_queue_count -= 1;

        Ok(())
    }

    async fn advance(
        &self,
        entry_id: Uuid,
        to_status: QueueStatus,
    ) -> Result<QueueEntry, LedgerError> {
        let mut state = self.state.lock().await;

        let index = state
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(LedgerError::NotFound)?;

        let entry = state.entries[index].clone();
        let business_id = entry.business_id;
        let freed_position = entry.position;
        let advanced = entry
            .advance_to(to_status)
            .map_err(|_| LedgerError::InvalidState)?;
        state.entries[index] = advanced.clone();

        if matches!(to_status, QueueStatus::Completed | QueueStatus::NoShow) {
            let average_wait = state
                .businesses
                .get(&business_id)
                .ok_or(LedgerError::NotFound)?
                .average_wait_minutes;

            for entry in state.entries.iter_mut() {
                if entry.business_id == business_id
                    && entry.status.is_active()
                    && entry.position > freed_position
                {
                    entry.position -= 1;
                    entry.estimated_wait_minutes = estimated_wait(entry.position, average_wait);
                }
            }

            let business = state.businesses.get_mut(&business_id).unwrap();
            business.current_queue_count -= 1;
        }

        Ok(advanced)
    }

    async fn find_for_user(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<QueueEntry>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state
            .entries
            .iter()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        params: QueueQueryParams,
    ) -> Result<(Vec<QueueEntry>, u64), LedgerError> {
        let state = self.state.lock().await;
        let mut matching: Vec<QueueEntry> = state
            .entries
            .iter()
            .filter(|e| e.user_id == params.user_id)
            .filter(|e| params.status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let page: Vec<QueueEntry> = matching
            .into_iter()
            .skip(params.offset as usize)
            .take(params.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn current_for_user(&self, user_id: Uuid) -> Result<Option<QueueEntry>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.status.is_active())
            .max_by_key(|e| e.created_at)
            .cloned())
    }

    async fn list_active_for_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<QueueEntry>, LedgerError> {
        let state = self.state.lock().await;
        let mut entries: Vec<QueueEntry> = state
            .entries
            .iter()
            .filter(|e| e.business_id == business_id && e.status.is_active())
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.position);
        Ok(entries)
    }

    async fn update_notes(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<QueueEntry, LedgerError> {
        let mut state = self.state.lock().await;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .ok_or(LedgerError::NotFound)?;
        entry.notes = notes;
        entry.updated_at = Utc::now().into();
        Ok(entry.clone())
    }
}

#[async_trait]
impl BusinessRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.businesses.get(&id).cloned())
    }

    async fn list(
        &self,
        _params: BusinessQueryParams,
    ) -> Result<(Vec<Business>, u64), RepositoryError> {
        let state = self.state.lock().await;
        let businesses: Vec<Business> = state.businesses.values().cloned().collect();
        let total = businesses.len() as u64;
        Ok((businesses, total))
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
