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

use crate::domain::models::review::Review;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 创建评价请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequestDto {
    pub business_id: Uuid,
    /// 关联的已完成排队条目，带上即标记为到店验证
    pub queue_entry_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment too long"))]
    pub comment: Option<String>,
}

/// 更新评价请求，只更新出现的字段
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequestDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000, message = "Comment too long"))]
    pub comment: Option<String>,
}

/// 评价列表查询参数
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQueryDto {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 评价响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: Uuid,
    pub business_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl ReviewDto {
    pub fn from_review(review: &Review, author_name: Option<String>) -> Self {
        Self {
            id: review.id,
            business_id: review.business_id,
            rating: review.rating,
            comment: review.comment.clone(),
            is_verified: review.is_verified,
            author_name,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// 评分分布响应，rating → 数量
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBucketDto {
    pub rating: i32,
    pub count: i64,
}
