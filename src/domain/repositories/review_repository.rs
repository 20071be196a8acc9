// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::review::Review;
use crate::domain::repositories::business_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 评价及作者名，商家评价列表用
#[derive(Debug, Clone)]
pub struct ReviewWithAuthor {
    pub review: Review,
    pub author_name: String,
}

/// 评价部分更新
#[derive(Debug, Default, Clone)]
pub struct ReviewUpdate {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// 评分分布，rating → 数量
pub type RatingDistribution = Vec<(i32, i64)>;

/// 评价仓库特质
///
/// 创建、更新与删除都在同一事务内重算商家的 average_rating 与
/// review_count 缓存，保持目录数据与评价表一致。
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// 创建评价并重算商家评分缓存
    async fn create(&self, review: &Review) -> Result<Review, RepositoryError>;
    /// 根据ID查找评价，校验归属
    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, RepositoryError>;
    /// 商家的评价列表（含作者名）与评分分布
    async fn list_for_business(
        &self,
        business_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ReviewWithAuthor>, u64, RatingDistribution), RepositoryError>;
    /// 用户自己的评价列表
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Review>, u64), RepositoryError>;
    /// 用户对某商家是否已有评价
    async fn exists_for_user_business(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, RepositoryError>;
    /// 部分更新评价并重算商家评分缓存
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: ReviewUpdate,
    ) -> Result<Review, RepositoryError>;
    /// 删除评价并重算商家评分缓存
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepositoryError>;
}
