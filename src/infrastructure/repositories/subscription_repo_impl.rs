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

use crate::domain::models::subscription::{
    PassStatus, Subscription, SubscriptionPlan, SubscriptionStatus, UserPass,
};
use crate::domain::repositories::business_repository::RepositoryError;
use crate::domain::repositories::subscription_repository::{
    PassUsageRecord, SubscriptionRepository,
};
use crate::infrastructure::database::entities::pass_usage as usage_entity;
use crate::infrastructure::database::entities::payment as payment_entity;
use crate::infrastructure::database::entities::subscription as subscription_entity;
use crate::infrastructure::database::entities::user_pass as pass_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 订阅仓库实现
///
/// 购买在一个事务内创建订阅、支付记账行与通行证；通行证核销
/// 在一个事务内标记已用并写入使用审计。
#[derive(Clone)]
pub struct SubscriptionRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepositoryImpl {
    /// 创建新的订阅仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<subscription_entity::Model> for Subscription {
    fn from(model: subscription_entity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            plan_type: model.plan_type.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            start_date: model.start_date,
            end_date: model.end_date,
            amount: model.amount,
            currency: model.currency,
            payment_method: model.payment_method.parse().unwrap_or_default(),
            cancelled_at: model.cancelled_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<pass_entity::Model> for UserPass {
    fn from(model: pass_entity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            subscription_id: model.subscription_id,
            pass_type: model.pass_type,
            status: model.status.parse().unwrap_or_default(),
            expires_at: model.expires_at,
            used_at: model.used_at,
            created_at: model.created_at,
        }
    }
}

impl From<usage_entity::Model> for PassUsageRecord {
    fn from(model: usage_entity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            subscription_id: model.subscription_id,
            business_id: model.business_id,
            queue_entry_id: model.queue_entry_id,
            pass_type: model.pass_type,
            used_at: model.used_at,
        }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn purchase(
        &self,
        subscription: &Subscription,
        passes: &[UserPass],
    ) -> Result<Subscription, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = subscription_entity::ActiveModel {
            id: Set(subscription.id),
            user_id: Set(subscription.user_id),
            plan_type: Set(subscription.plan_type.to_string()),
            status: Set(subscription.status.to_string()),
            start_date: Set(subscription.start_date),
            end_date: Set(subscription.end_date),
            amount: Set(subscription.amount),
            currency: Set(subscription.currency.clone()),
            payment_method: Set(subscription.payment_method.to_string()),
            cancelled_at: Set(subscription.cancelled_at),
            created_at: Set(subscription.created_at),
            updated_at: Set(subscription.updated_at),
        };
        model.insert(&txn).await?;

        // Local bookkeeping only; no external charge happens here
        let payment = payment_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(subscription.user_id),
            subscription_id: Set(Some(subscription.id)),
            amount: Set(subscription.amount),
            currency: Set(subscription.currency.clone()),
            payment_method: Set(subscription.payment_method.to_string()),
            status: Set("completed".to_string()),
            processed_at: Set(Some(Utc::now().into())),
            created_at: Set(Utc::now().into()),
        };
        payment.insert(&txn).await?;

        for pass in passes {
            let pass_model = pass_entity::ActiveModel {
                id: Set(pass.id),
                user_id: Set(pass.user_id),
                subscription_id: Set(pass.subscription_id),
                pass_type: Set(pass.pass_type.clone()),
                status: Set(pass.status.to_string()),
                expires_at: Set(pass.expires_at),
                used_at: Set(pass.used_at),
                created_at: Set(pass.created_at),
            };
            pass_model.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(subscription.clone())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError> {
        let models = subscription_entity::Entity::find()
            .filter(subscription_entity::Column::UserId.eq(user_id))
            .order_by_desc(subscription_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Subscription::from).collect())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, RepositoryError> {
        let model = subscription_entity::Entity::find_by_id(id)
            .filter(subscription_entity::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_active_unlimited(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, RepositoryError> {
        let model = subscription_entity::Entity::find()
            .filter(subscription_entity::Column::UserId.eq(user_id))
            .filter(subscription_entity::Column::PlanType.is_in(vec![
                SubscriptionPlan::Monthly.to_string(),
                SubscriptionPlan::Yearly.to_string(),
            ]))
            .filter(subscription_entity::Column::Status.eq(SubscriptionStatus::Active.to_string()))
            .filter(subscription_entity::Column::EndDate.gt(Utc::now()))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_passes(&self, user_id: Uuid) -> Result<Vec<UserPass>, RepositoryError> {
        let models = pass_entity::Entity::find()
            .filter(pass_entity::Column::UserId.eq(user_id))
            .order_by_desc(pass_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(UserPass::from).collect())
    }

    async fn find_usable_pass(&self, user_id: Uuid) -> Result<Option<UserPass>, RepositoryError> {
        let model = pass_entity::Entity::find()
            .filter(pass_entity::Column::UserId.eq(user_id))
            .filter(pass_entity::Column::Status.eq(PassStatus::Available.to_string()))
            .filter(pass_entity::Column::ExpiresAt.gt(Utc::now()))
            .order_by_asc(pass_entity::Column::ExpiresAt)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn consume_pass(
        &self,
        pass_id: Uuid,
        usage: &PassUsageRecord,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let model = pass_entity::Entity::find_by_id(pass_id)
            .filter(pass_entity::Column::Status.eq(PassStatus::Available.to_string()))
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: pass_entity::ActiveModel = model.into();
        active.status = Set(PassStatus::Used.to_string());
        active.used_at = Set(Some(Utc::now().into()));
        active.update(&txn).await?;

        let usage_model = usage_entity::ActiveModel {
            id: Set(usage.id),
            user_id: Set(usage.user_id),
            subscription_id: Set(usage.subscription_id),
            business_id: Set(usage.business_id),
            queue_entry_id: Set(usage.queue_entry_id),
            pass_type: Set(usage.pass_type.clone()),
            used_at: Set(usage.used_at),
        };
        usage_model.insert(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn record_usage(&self, usage: &PassUsageRecord) -> Result<(), RepositoryError> {
        let usage_model = usage_entity::ActiveModel {
            id: Set(usage.id),
            user_id: Set(usage.user_id),
            subscription_id: Set(usage.subscription_id),
            business_id: Set(usage.business_id),
            queue_entry_id: Set(usage.queue_entry_id),
            pass_type: Set(usage.pass_type.clone()),
            used_at: Set(usage.used_at),
        };
        usage_model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn usage_history(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<PassUsageRecord>, u64), RepositoryError> {
        let base = usage_entity::Entity::find()
            .filter(usage_entity::Column::UserId.eq(user_id));

        let total = base.clone().count(self.db.as_ref()).await?;

        let models = base
            .order_by_desc(usage_entity::Column::UsedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(PassUsageRecord::from).collect(), total))
    }

    async fn cancel(&self, id: Uuid, user_id: Uuid) -> Result<Subscription, RepositoryError> {
        let model = subscription_entity::Entity::find_by_id(id)
            .filter(subscription_entity::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: subscription_entity::ActiveModel = model.into();
        active.status = Set(SubscriptionStatus::Cancelled.to_string());
        active.cancelled_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }
}
