// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::business::{Business, BusinessCategory};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突
    #[error("Record already exists")]
    Duplicate,
}

/// 商家目录查询参数
#[derive(Debug, Default, Clone)]
pub struct BusinessQueryParams {
    pub category: Option<BusinessCategory>,
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// 商家目录仓库特质
///
/// 定义商家目录的数据访问接口。current_queue_count 等队列投影
/// 字段只读；它们的写入由排队台账在自己的事务内完成。
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// 根据ID查找商家
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, RepositoryError>;
    /// 目录列表，按类别/关键词过滤并分页
    async fn list(&self, params: BusinessQueryParams)
        -> Result<(Vec<Business>, u64), RepositoryError>;
    /// 轻量搜索，名称与描述的关键词匹配
    async fn search(
        &self,
        query: &str,
        category: Option<BusinessCategory>,
        limit: u64,
    ) -> Result<Vec<Business>, RepositoryError>;
}
