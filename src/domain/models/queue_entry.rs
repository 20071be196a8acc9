// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::models::DomainError;

/// 排队条目实体
///
/// 表示一个用户在某商家等待队列中的一次准入记录。活跃条目
/// （waiting/notified）在同一商家内构成稠密的位置排名 1..N，
/// N 等于商家缓存的当前排队人数。终态条目永不删除，作为历史保留。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    /// 条目唯一标识符
    pub id: Uuid,
    /// 所属商家ID，创建后不可变
    pub business_id: Uuid,
    /// 排队用户ID，创建后不可变
    pub user_id: Uuid,
    /// 队列位置，活跃条目在同一商家内稠密排名，最小为1
    pub position: i32,
    /// 预计等待分钟数，等于 position × 商家平均服务时长
    pub estimated_wait_minutes: i32,
    /// 条目状态
    pub status: QueueStatus,
    /// 加入队列时间
    pub joined_at: DateTime<FixedOffset>,
    /// 被叫号时间，进入 notified 状态时设置一次
    pub notified_at: Option<DateTime<FixedOffset>>,
    /// 完成时间，进入 completed/no_show 状态时设置一次
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 取消时间，进入 cancelled 状态时设置一次
    pub cancelled_at: Option<DateTime<FixedOffset>>,
    /// 用户备注，任何状态下均可修改
    pub notes: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 排队条目状态枚举
///
/// 状态转换遵循以下流程：
/// Waiting → Notified → Completed
/// Waiting → Cancelled
/// Waiting/Notified → NoShow
/// 终态（Completed/Cancelled/NoShow）不允许任何后续转换。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// 等待中，计入容量与位置排名
    #[default]
    Waiting,
    /// 已叫号，仍计入容量与位置排名
    Notified,
    /// 已完成服务
    Completed,
    /// 用户主动离开队列
    Cancelled,
    /// 叫号后未到场
    NoShow,
}

impl QueueStatus {
    /// 判断状态是否计入容量与位置排名
    pub fn is_active(&self) -> bool {
        matches!(self, QueueStatus::Waiting | QueueStatus::Notified)
    }

    /// 判断状态是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QueueStatus::Completed | QueueStatus::Cancelled | QueueStatus::NoShow
        )
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueueStatus::Waiting => write!(f, "waiting"),
            QueueStatus::Notified => write!(f, "notified"),
            QueueStatus::Completed => write!(f, "completed"),
            QueueStatus::Cancelled => write!(f, "cancelled"),
            QueueStatus::NoShow => write!(f, "no_show"),
        }
    }
}

impl FromStr for QueueStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(QueueStatus::Waiting),
            "notified" => Ok(QueueStatus::Notified),
            "completed" => Ok(QueueStatus::Completed),
            "cancelled" => Ok(QueueStatus::Cancelled),
            "no_show" => Ok(QueueStatus::NoShow),
            _ => Err(()),
        }
    }
}

/// 计算新加入条目的位置
///
/// 位置等于当前活跃人数加一。
pub fn next_position(current_queue_count: i32) -> i32 {
    current_queue_count + 1
}

/// 计算预计等待分钟数
///
/// 线性估算：位置 × 商家平均服务时长，不是保证值。
pub fn estimated_wait(position: i32, average_wait_minutes: i32) -> i32 {
    position * average_wait_minutes
}

impl QueueEntry {
    /// 创建一个新的排队条目
    ///
    /// # 参数
    ///
    /// * `business_id` - 所属商家ID
    /// * `user_id` - 排队用户ID
    /// * `position` - 分配的队列位置
    /// * `average_wait_minutes` - 商家平均服务时长
    ///
    /// # 返回值
    ///
    /// 返回状态为 Waiting 的新条目
    pub fn new(business_id: Uuid, user_id: Uuid, position: i32, average_wait_minutes: i32) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            business_id,
            user_id,
            position,
            estimated_wait_minutes: estimated_wait(position, average_wait_minutes),
            status: QueueStatus::Waiting,
            joined_at: now,
            notified_at: None,
            completed_at: None,
            cancelled_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 叫号
    ///
    /// 将条目状态从 Waiting 变更为 Notified
    pub fn notify(mut self) -> Result<Self, DomainError> {
        match self.status {
            QueueStatus::Waiting => {
                self.status = QueueStatus::Notified;
                self.notified_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成服务
    ///
    /// 将条目状态从 Notified 变更为 Completed
    pub fn complete(mut self) -> Result<Self, DomainError> {
        match self.status {
            QueueStatus::Notified => {
                self.status = QueueStatus::Completed;
                self.completed_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 取消排队
    ///
    /// 将条目状态从 Waiting 变更为 Cancelled。已被叫号的用户
    /// 不能再主动离开队列。
    pub fn cancel(mut self) -> Result<Self, DomainError> {
        match self.status {
            QueueStatus::Waiting => {
                self.status = QueueStatus::Cancelled;
                self.cancelled_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记未到场
    ///
    /// 将条目状态从 Waiting 或 Notified 变更为 NoShow
    pub fn no_show(mut self) -> Result<Self, DomainError> {
        match self.status {
            QueueStatus::Waiting | QueueStatus::Notified => {
                self.status = QueueStatus::NoShow;
                self.completed_at = Some(Utc::now().into());
                self.updated_at = Utc::now().into();
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 按目标状态执行一次转换
    ///
    /// 业务端 advance 操作的入口，只接受 Notified/Completed/NoShow
    /// 三个目标状态。
    pub fn advance_to(self, to_status: QueueStatus) -> Result<Self, DomainError> {
        match to_status {
            QueueStatus::Notified => self.notify(),
            QueueStatus::Completed => self.complete(),
            QueueStatus::NoShow => self.no_show(),
            _ => Err(DomainError::InvalidStateTransition),
        }
    }
}

#[cfg(test)]
#[path = "queue_entry_test.rs"]
mod tests;
