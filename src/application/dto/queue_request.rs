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

use crate::domain::models::queue_entry::{QueueEntry, QueueStatus};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 加入队列请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinQueueRequestDto {
    pub business_id: Uuid,
}

/// 更新备注请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotesRequestDto {
    #[validate(length(max = 500, message = "Notes too long"))]
    pub notes: Option<String>,
}

/// 推进状态请求（商家侧）
///
/// 目标状态只能是 notified/completed/no_show。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequestDto {
    pub to_status: QueueStatus,
}

/// 用户历史队列查询参数
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueListQueryDto {
    pub status: Option<QueueStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 排队条目响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryDto {
    pub id: Uuid,
    pub business_id: Uuid,
    pub position: i32,
    pub estimated_wait_minutes: i32,
    pub status: QueueStatus,
    pub joined_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<&QueueEntry> for QueueEntryDto {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            id: entry.id,
            business_id: entry.business_id,
            position: entry.position,
            estimated_wait_minutes: entry.estimated_wait_minutes,
            status: entry.status,
            joined_at: entry.joined_at,
            notified_at: entry.notified_at,
            completed_at: entry.completed_at,
            cancelled_at: entry.cancelled_at,
            notes: entry.notes.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
