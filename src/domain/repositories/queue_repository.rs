// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::queue_entry::{QueueEntry, QueueStatus};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 台账错误类型
///
/// 排队台账对外暴露的全部错误种类。所有变更操作都是
/// 全有或全无的：任何失败都不会留下部分写入。
#[derive(Error, Debug)]
pub enum LedgerError {
    /// 商家或条目不存在，或条目不属于调用方
    #[error("Record not found")]
    NotFound,
    /// 商家当前停业，拒绝加入
    #[error("Business is currently inactive")]
    Inactive,
    /// 队列已满
    #[error("Queue is full")]
    Full,
    /// 用户在该商家已有活跃条目
    #[error("User already has an active queue entry for this business")]
    Conflict,
    /// 非法状态转换，或对非 waiting 条目执行 leave
    #[error("Invalid queue entry state for this operation")]
    InvalidState,
    /// 锁超时或序列化失败，整个操作可安全重试
    #[error("Transient store error: {0}")]
    TransientStore(DbErr),
    /// 其他数据库错误
    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}

/// 用户队列查询参数
#[derive(Debug, Default, Clone)]
pub struct QueueQueryParams {
    pub user_id: Uuid,
    pub status: Option<QueueStatus>,
    pub limit: u64,
    pub offset: u64,
}

/// 排队台账仓库特质
///
/// 定义排队条目的数据访问接口。join/leave/advance 是台账的
/// 事务边界：每个调用在存储层作为单个原子事务执行，提交后
/// 商家的活跃位置集合必须恰好等于 {1..current_queue_count}。
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// 加入队列
    ///
    /// 在一个事务内锁定商家行，检查营业状态、重复排队与容量，
    /// 以位置 count+1 插入条目并递增商家计数。
    async fn join(&self, business_id: Uuid, user_id: Uuid) -> Result<QueueEntry, LedgerError>;

    /// 离开队列
    ///
    /// 仅允许条目所有者对 waiting 条目调用。在一个事务内标记
    /// cancelled，压缩其后条目的位置并重算等待估计，递减商家计数。
    async fn leave(&self, entry_id: Uuid, user_id: Uuid) -> Result<(), LedgerError>;

    /// 推进条目状态
    ///
    /// 目标状态只能是 notified/completed/no_show。completed 与
    /// no_show 释放队列槽位：与 leave 相同的压缩与计数递减在
    /// 同一事务内执行。notified 不改变任何位置。
    async fn advance(
        &self,
        entry_id: Uuid,
        to_status: QueueStatus,
    ) -> Result<QueueEntry, LedgerError>;

    /// 根据ID查找条目，校验归属
    async fn find_for_user(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<QueueEntry>, LedgerError>;

    /// 分页查询用户的历史条目
    async fn list_for_user(
        &self,
        params: QueueQueryParams,
    ) -> Result<(Vec<QueueEntry>, u64), LedgerError>;

    /// 用户当前的活跃条目（最近加入的一条）
    async fn current_for_user(&self, user_id: Uuid) -> Result<Option<QueueEntry>, LedgerError>;

    /// 商家的全部活跃条目，按位置升序
    async fn list_active_for_business(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<QueueEntry>, LedgerError>;

    /// 更新条目备注，不影响任何不变量
    async fn update_notes(
        &self,
        entry_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<QueueEntry, LedgerError>;
}
