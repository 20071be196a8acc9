// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::queue_entry::{next_position, QueueEntry, QueueStatus};
use crate::domain::repositories::queue_repository::{
    LedgerError, QueueQueryParams, QueueRepository,
};
use crate::infrastructure::database::entities::business as business_entity;
use crate::infrastructure::database::entities::queue_entry as entry_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, LockType},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 排队台账仓库实现
///
/// 基于SeaORM实现的排队条目数据访问层。join/leave/advance 都在
/// 单个事务内执行，并持有商家聚合行的行级锁（SELECT ... FOR
/// UPDATE），使同一商家上的并发变更串行化；未提交的事务在
/// 出错返回时随 Drop 回滚，不会暴露部分写入。
#[derive(Clone)]
pub struct QueueRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl QueueRepositoryImpl {
    /// 创建新的排队台账仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// 活跃状态列表，容量与位置排名只统计这两种状态
fn active_statuses() -> Vec<String> {
    vec![
        QueueStatus::Waiting.to_string(),
        QueueStatus::Notified.to_string(),
    ]
}

/// 区分可重试的瞬时存储错误与其他数据库错误
///
/// 锁等待超时、死锁与序列化失败整体重试是安全的，因为每个
/// 操作都是一个完整的事务。
fn classify_db_err(err: DbErr) -> LedgerError {
    let message = err.to_string().to_lowercase();
    if message.contains("deadlock")
        || message.contains("could not serialize")
        || message.contains("serialization failure")
        || message.contains("lock timeout")
        || message.contains("lock_timeout")
    {
        LedgerError::TransientStore(err)
    } else {
        LedgerError::Store(err)
    }
}

impl From<entry_entity::Model> for QueueEntry {
    fn from(model: entry_entity::Model) -> Self {
        Self {
            id: model.id,
            business_id: model.business_id,
            user_id: model.user_id,
            position: model.position,
            estimated_wait_minutes: model.estimated_wait_minutes,
            status: model.status.parse().unwrap_or_default(),
            joined_at: model.joined_at,
            notified_at: model.notified_at,
            completed_at: model.completed_at,
            cancelled_at: model.cancelled_at,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<QueueEntry> for entry_entity::ActiveModel {
    fn from(entry: QueueEntry) -> Self {
        Self {
            id: Set(entry.id),
            business_id: Set(entry.business_id),
            user_id: Set(entry.user_id),
            position: Set(entry.position),
            estimated_wait_minutes: Set(entry.estimated_wait_minutes),
            status: Set(entry.status.to_string()),
            joined_at: Set(entry.joined_at),
            notified_at: Set(entry.notified_at),
            completed_at: Set(entry.completed_at),
            cancelled_at: Set(entry.cancelled_at),
            notes: Set(entry.notes),
            created_at: Set(entry.created_at),
            updated_at: Set(entry.updated_at),
        }
    }
}

impl QueueRepositoryImpl {
    /// 在已持有商家行锁的事务内释放一个槽位
    ///
    /// 压缩 removed_position 之后的活跃位置并按新位置重算等待
    /// 估计，然后将商家计数减一。单条 UPDATE 中所有 SET 表达式
    /// 读取的都是旧列值，(position - 1) × avg 因此成立。
    async fn free_slot(
        &self,
        txn: &DatabaseTransaction,
        business: business_entity::Model,
        removed_position: i32,
    ) -> Result<(), LedgerError> {
        let business_id = business.id;
        let average_wait = business.average_wait_minutes;
        let new_count = business.current_queue_count - 1;

        entry_entity::Entity::update_many()
            .col_expr(
                entry_entity::Column::Position,
                Expr::col(entry_entity::Column::Position).sub(Expr::val(1)),
            )
            .col_expr(
                entry_entity::Column::EstimatedWaitMinutes,
                Expr::col(entry_entity::Column::Position)
                    .sub(Expr::val(1))
                    .mul(Expr::val(average_wait)),
            )
            .col_expr(
                entry_entity::Column::UpdatedAt,
                Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())),
            )
            .filter(entry_entity::Column::BusinessId.eq(business_id))
            .filter(entry_entity::Column::Position.gt(removed_position))
            .filter(entry_entity::Column::Status.is_in(active_statuses()))
            .exec(txn)
            .await
            .map_err(classify_db_err)?;

        let mut business: business_entity::ActiveModel = business.into();
        business.current_queue_count = Set(new_count.max(0));
        business.updated_at = Set(Utc::now().into());
        business.update(txn).await.map_err(classify_db_err)?;

        Ok(())
    }

    /// 锁定商家聚合行
    ///
    /// 同一商家上的所有变更操作在这把锁上串行化。
    async fn lock_business(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
    ) -> Result<Option<business_entity::Model>, LedgerError> {
        business_entity::Entity::find_by_id(business_id)
            .lock(LockType::Update)
            .one(txn)
            .await
            .map_err(classify_db_err)
    }
}

#[async_trait]
impl QueueRepository for QueueRepositoryImpl {
    async fn join(&self, business_id: Uuid, user_id: Uuid) -> Result<QueueEntry, LedgerError> {
        let txn = self.db.begin().await.map_err(classify_db_err)?;

        let business = self
            .lock_business(&txn, business_id)
            .await?
            .ok_or(LedgerError::NotFound)?;

        if !business.is_active {
            return Err(LedgerError::Inactive);
        }

        // Per-user single active membership
        let existing = entry_entity::Entity::find()
            .filter(entry_entity::Column::UserId.eq(user_id))
            .filter(entry_entity::Column::BusinessId.eq(business_id))
            .filter(entry_entity::Column::Status.is_in(active_statuses()))
            .count(&txn)
            .await
            .map_err(classify_db_err)?;
        if existing > 0 {
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
        let model: entry_entity::ActiveModel = entry.clone().into();
        model.insert(&txn).await.map_err(classify_db_err)?;

        let new_count = entry.position;
        let mut business: business_entity::ActiveModel = business.into();
        business.current_queue_count = Set(new_count);
        business.updated_at = Set(Utc::now().into());
        business.update(&txn).await.map_err(classify_db_err)?;

        txn.commit().await.map_err(classify_db_err)?;
        Ok(entry)
    }

    async fn leave(&self, entry_id: Uuid, user_id: Uuid) -> Result<(), LedgerError> {
        let txn = self.db.begin().await.map_err(classify_db_err)?;

        // First read resolves the business id; the authoritative re-read
        // happens below under the business row lock.
        let probe = entry_entity::Entity::find_by_id(entry_id)
            .filter(entry_entity::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(classify_db_err)?
            .ok_or(LedgerError::NotFound)?;

        let business = self
            .lock_business(&txn, probe.business_id)
            .await?
            .ok_or(LedgerError::NotFound)?;

        let model = entry_entity::Entity::find_by_id(entry_id)
            .filter(entry_entity::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(classify_db_err)?
            .ok_or(LedgerError::NotFound)?;

        let entry: QueueEntry = model.into();
        let removed_position = entry.position;
        let cancelled = entry.cancel().map_err(|_| LedgerError::InvalidState)?;

        // Conditional single-statement transition: the status filter makes
        // the waiting -> cancelled step atomic even against writers that do
        // not take the business row lock
        let result = entry_entity::Entity::update_many()
            .col_expr(
                entry_entity::Column::Status,
                Expr::value(cancelled.status.to_string()),
            )
            .col_expr(
                entry_entity::Column::CancelledAt,
                Expr::value(cancelled.cancelled_at),
            )
            .col_expr(
                entry_entity::Column::UpdatedAt,
                Expr::value(cancelled.updated_at),
            )
            .filter(entry_entity::Column::Id.eq(entry_id))
            .filter(entry_entity::Column::Status.eq(QueueStatus::Waiting.to_string()))
            .exec(&txn)
            .await
            .map_err(classify_db_err)?;
        if result.rows_affected == 0 {
            return Err(LedgerError::InvalidState);
        }

        self.free_slot(&txn, business, removed_position).await?;

        txn.commit().await.map_err(classify_db_err)?;
        Ok(())
    }

    async fn advance(
        &self,
        entry_id: Uuid,
        to_status: QueueStatus,
    ) -> Result<QueueEntry, LedgerError> {
        let txn = self.db.begin().await.map_err(classify_db_err)?;

        let probe = entry_entity::Entity::find_by_id(entry_id)
            .one(&txn)
            .await
            .map_err(classify_db_err)?
            .ok_or(LedgerError::NotFound)?;

        // notified keeps the slot; completed/no_show free it and need the
        // same business row lock as leave for the compaction step
        let frees_slot = matches!(to_status, QueueStatus::Completed | QueueStatus::NoShow);

        let business = if frees_slot {
            Some(
                self.lock_business(&txn, probe.business_id)
                    .await?
                    .ok_or(LedgerError::NotFound)?,
            )
        } else {
            None
        };

        let model = entry_entity::Entity::find_by_id(entry_id)
            .one(&txn)
            .await
            .map_err(classify_db_err)?
            .ok_or(LedgerError::NotFound)?;

        let entry: QueueEntry = model.into();
        let freed_position = entry.position;
        let advanced = entry
            .advance_to(to_status)
            .map_err(|_| LedgerError::InvalidState)?;

        // Conditional single-statement transition, filtered on the legal
        // source states. Position is never written here, so a plain notify
        // cannot clobber a compaction running concurrently
        let source_states: Vec<String> = match to_status {
            QueueStatus::Notified => vec![QueueStatus::Waiting.to_string()],
            QueueStatus::Completed => vec![QueueStatus::Notified.to_string()],
            QueueStatus::NoShow => active_statuses(),
            _ => return Err(LedgerError::InvalidState),
        };
        let result = entry_entity::Entity::update_many()
            .col_expr(
                entry_entity::Column::Status,
                Expr::value(advanced.status.to_string()),
            )
            .col_expr(
                entry_entity::Column::NotifiedAt,
                Expr::value(advanced.notified_at),
            )
            .col_expr(
                entry_entity::Column::CompletedAt,
                Expr::value(advanced.completed_at),
            )
            .col_expr(
                entry_entity::Column::UpdatedAt,
                Expr::value(advanced.updated_at),
            )
            .filter(entry_entity::Column::Id.eq(entry_id))
            .filter(entry_entity::Column::Status.is_in(source_states))
            .exec(&txn)
            .await
            .map_err(classify_db_err)?;
        if result.rows_affected == 0 {
            return Err(LedgerError::InvalidState);
        }

        if let Some(business) = business {
            self.free_slot(&txn, business, freed_position).await?;
        }

        txn.commit().await.map_err(classify_db_err)?;
        Ok(advanced)
    }

    async fn find_for_user(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<QueueEntry>, LedgerError> {
        let model = entry_entity::Entity::find_by_id(entry_id)
            .filter(entry_entity::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(classify_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_for_user(
        &self,
        params: QueueQueryParams,
    ) -> Result<(Vec<QueueEntry>, u64), LedgerError> {
        let mut query =
            entry_entity::Entity::find().filter(entry_entity::Column::UserId.eq(params.user_id));

        if let Some(status) = params.status {
            query = query.filter(entry_entity::Column::Status.eq(status.to_string()));
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(classify_db_err)?;

        let models = query
            .order_by_desc(entry_entity::Column::CreatedAt)
            .limit(params.limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await
            .map_err(classify_db_err)?;

        Ok((models.into_iter().map(QueueEntry::from).collect(), total))
    }

    async fn current_for_user(&self, user_id: Uuid) -> Result<Option<QueueEntry>, LedgerError> {
        let model = entry_entity::Entity::find()
            .filter(entry_entity::Column::UserId.eq(user_id))
            .filter(entry_entity::Column::Status.is_in(active_statuses()))
            .order_by_desc(entry_entity::Column::CreatedAt)
            .one(self.db.as_ref())
            .await
            .map_err(classify_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_active_for_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<QueueEntry>, LedgerError> {
        let models = entry_entity::Entity::find()
            .filter(entry_entity::Column::BusinessId.eq(business_id))
            .filter(entry_entity::Column::Status.is_in(active_statuses()))
            .order_by_asc(entry_entity::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(classify_db_err)?;

        Ok(models.into_iter().map(QueueEntry::from).collect())
    }

    async fn update_notes(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<QueueEntry, LedgerError> {
        entry_entity::Entity::find_by_id(entry_id)
            .filter(entry_entity::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(classify_db_err)?
            .ok_or(LedgerError::NotFound)?;

        // Notes only; position and status belong to the transactional paths
        let active = entry_entity::ActiveModel {
            id: Set(entry_id),
            notes: Set(notes),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let updated = active
            .update(self.db.as_ref())
            .await
            .map_err(classify_db_err)?;
        Ok(updated.into())
    }
}
