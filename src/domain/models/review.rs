// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 评价实体
///
/// 每个用户对每个商家至多一条评价。关联到已完成排队条目的
/// 评价标记为已验证。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// 评价唯一标识符
    pub id: Uuid,
    /// 评价用户ID
    pub user_id: Uuid,
    /// 被评价商家ID
    pub business_id: Uuid,
    /// 关联的排队条目ID，存在即视为到店验证
    pub queue_entry_id: Option<Uuid>,
    /// 评分，1到5
    pub rating: i32,
    /// 评价内容
    pub comment: Option<String>,
    /// 是否到店验证
    pub is_verified: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl Review {
    /// 创建一条新评价
    pub fn new(
        user_id: Uuid,
        business_id: Uuid,
        queue_entry_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
    ) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            user_id,
            business_id,
            queue_entry_id,
            rating,
            comment,
            is_verified: queue_entry_id.is_some(),
            created_at: now,
            updated_at: now,
        }
    }
}
