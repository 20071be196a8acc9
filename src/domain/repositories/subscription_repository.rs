// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::subscription::{Subscription, UserPass};
use crate::domain::repositories::business_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 一次通行证使用的审计记录
#[derive(Debug, Clone)]
pub struct PassUsageRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    pub business_id: Uuid,
    pub queue_entry_id: Uuid,
    pub pass_type: String,
    pub used_at: DateTime<FixedOffset>,
}

/// 订阅仓库特质
///
/// 购买与通行证核销是多行写入，各自在一个事务内完成。
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// 购买：创建订阅、支付记账行与（月付计划的）通行证
    async fn purchase(
        &self,
        subscription: &Subscription,
        passes: &[UserPass],
    ) -> Result<Subscription, RepositoryError>;
    /// 用户的订阅列表
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Subscription>, RepositoryError>;
    /// 根据ID查找订阅，校验归属
    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, RepositoryError>;
    /// 用户当前有效的不限次数订阅（月付或年付）
    async fn find_active_unlimited(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Subscription>, RepositoryError>;
    /// 用户的通行证列表
    async fn list_passes(&self, user_id: Uuid) -> Result<Vec<UserPass>, RepositoryError>;
    /// 用户下一张可用通行证
    async fn find_usable_pass(&self, user_id: Uuid) -> Result<Option<UserPass>, RepositoryError>;
    /// 核销通行证并写入使用审计，单个事务
    async fn consume_pass(
        &self,
        pass_id: Uuid,
        usage: &PassUsageRecord,
    ) -> Result<(), RepositoryError>;
    /// 仅写入使用审计（年付订阅核销时没有通行证行）
    async fn record_usage(&self, usage: &PassUsageRecord) -> Result<(), RepositoryError>;
    /// 用户的使用历史
    async fn usage_history(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<PassUsageRecord>, u64), RepositoryError>;
    /// 取消订阅
    async fn cancel(&self, id: Uuid, user_id: Uuid) -> Result<Subscription, RepositoryError>;
}
