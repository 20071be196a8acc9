// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::queue_entry::{estimated_wait, next_position, QueueEntry, QueueStatus};
use crate::domain::repositories::business_repository::{BusinessRepository, RepositoryError};
use crate::domain::repositories::queue_repository::{
    LedgerError, QueueQueryParams, QueueRepository,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// 加入前的等待估算
///
/// 纯粹由商家当前状态推导，读取无锁，允许轻微过期。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitEstimate {
    pub next_position: i32,
    pub estimated_wait_minutes: i32,
}

/// 商家队列统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub business_id: Uuid,
    pub current_queue_count: i32,
    pub max_queue_capacity: i32,
    pub average_wait_minutes: i32,
    pub is_active: bool,
}

/// 排队台账服务
///
/// 队列准入与位置维护的唯一入口。变更操作委托给仓库在单个
/// 事务内执行；瞬时存储错误（锁超时、序列化失败）在这里做
/// 一次有界的立即重试后再上抛。
pub struct QueueLedger {
    queue_repo: Arc<dyn QueueRepository>,
    business_repo: Arc<dyn BusinessRepository>,
}

impl QueueLedger {
    /// 创建新的台账服务实例
    pub fn new(
        queue_repo: Arc<dyn QueueRepository>,
        business_repo: Arc<dyn BusinessRepository>,
    ) -> Self {
        Self {
            queue_repo,
            business_repo,
        }
    }

    /// 加入队列
    ///
    /// # 参数
    ///
    /// * `business_id` - 目标商家ID
    /// * `user_id` - 已认证的用户ID
    ///
    /// # 返回值
    ///
    /// * `Ok(QueueEntry)` - 新创建的 waiting 条目，位置为 count+1
    /// * `Err(LedgerError)` - NotFound/Inactive/Conflict/Full 或存储错误
    pub async fn join(&self, business_id: Uuid, user_id: Uuid) -> Result<QueueEntry, LedgerError> {
        let entry = match self.queue_repo.join(business_id, user_id).await {
            Err(LedgerError::TransientStore(err)) => {
                tracing::warn!(
                    "Transient store error on join for business {}, retrying once: {}",
                    business_id,
                    err
                );
                self.queue_repo.join(business_id, user_id).await?
            }
            other => other?,
        };

        tracing::info!(
            "User {} joined queue for business {} at position {}",
            user_id,
            business_id,
            entry.position
        );
        Ok(entry)
    }

    /// 离开队列
    ///
    /// 只有条目所有者能对 waiting 条目调用；压缩与计数维护由
    /// 仓库在同一事务内完成。
    pub async fn leave(&self, entry_id: Uuid, user_id: Uuid) -> Result<(), LedgerError> {
        match self.queue_repo.leave(entry_id, user_id).await {
            Err(LedgerError::TransientStore(err)) => {
                tracing::warn!(
                    "Transient store error on leave for entry {}, retrying once: {}",
                    entry_id,
                    err
                );
                self.queue_repo.leave(entry_id, user_id).await?;
            }
            other => other?,
        }

        tracing::info!("User {} left queue entry {}", user_id, entry_id);
        Ok(())
    }

    /// 推进条目状态（商家侧操作）
    ///
    /// notified 只改单行；completed/no_show 同时释放槽位。
    pub async fn advance(
        &self,
        entry_id: Uuid,
        to_status: QueueStatus,
    ) -> Result<QueueEntry, LedgerError> {
        let entry = match self.queue_repo.advance(entry_id, to_status).await {
            Err(LedgerError::TransientStore(err)) => {
                tracing::warn!(
                    "Transient store error on advance for entry {}, retrying once: {}",
                    entry_id,
                    err
                );
                self.queue_repo.advance(entry_id, to_status).await?
            }
            other => other?,
        };

        tracing::info!("Queue entry {} advanced to {}", entry_id, to_status);
        Ok(entry)
    }

    /// 加入前的等待估算
    ///
    /// next_position = count + 1；估算值不加锁读取，
    /// 对估算而言最终一致即可。
    pub async fn estimate(&self, business_id: Uuid) -> Result<WaitEstimate, LedgerError> {
        let business = self
            .business_repo
            .find_by_id(business_id)
            .await
            .map_err(|err| match err {
                RepositoryError::Database(db) => LedgerError::Store(db),
                _ => LedgerError::NotFound,
            })?
            .ok_or(LedgerError::NotFound)?;

        let position = next_position(business.current_queue_count);
        Ok(WaitEstimate {
            next_position: position,
            estimated_wait_minutes: estimated_wait(position, business.average_wait_minutes),
        })
    }

    /// 商家队列统计
    pub async fn stats(&self, business_id: Uuid) -> Result<QueueStats, LedgerError> {
        let business = self
            .business_repo
            .find_by_id(business_id)
            .await
            .map_err(|err| match err {
                RepositoryError::Database(db) => LedgerError::Store(db),
                _ => LedgerError::NotFound,
            })?
            .ok_or(LedgerError::NotFound)?;

        Ok(QueueStats {
            business_id: business.id,
            current_queue_count: business.current_queue_count,
            max_queue_capacity: business.max_queue_capacity,
            average_wait_minutes: business.average_wait_minutes,
            is_active: business.is_active,
        })
    }

    /// 根据ID读取条目，校验归属
    pub async fn get_for_user(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
    ) -> Result<QueueEntry, LedgerError> {
        self.queue_repo
            .find_for_user(entry_id, user_id)
            .await?
            .ok_or(LedgerError::NotFound)
    }

    /// 用户历史条目分页查询
    pub async fn list_for_user(
        &self,
        params: QueueQueryParams,
    ) -> Result<(Vec<QueueEntry>, u64), LedgerError> {
        self.queue_repo.list_for_user(params).await
    }

    /// 用户当前活跃条目
    pub async fn current_for_user(&self, user_id: Uuid) -> Result<Option<QueueEntry>, LedgerError> {
        self.queue_repo.current_for_user(user_id).await
    }

    /// 商家活跃条目列表，按位置升序
    pub async fn list_active_for_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<QueueEntry>, LedgerError> {
        self.queue_repo.list_active_for_business(business_id).await
    }

    /// 更新条目备注
    pub async fn update_notes(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<QueueEntry, LedgerError> {
        self.queue_repo.update_notes(entry_id, user_id, notes).await
    }
}

#[cfg(test)]
#[path = "queue_ledger_test.rs"]
mod tests;
