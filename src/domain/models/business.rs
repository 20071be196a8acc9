// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 商家实体
///
/// 排队台账只依赖其中的队列投影字段：is_active、
/// max_queue_capacity、current_queue_count、average_wait_minutes。
/// current_queue_count 是活跃条目数的缓存，必须与条目表保持一致，
/// 只能在台账自己的事务内更新。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    /// 商家唯一标识符
    pub id: Uuid,
    /// 商家名称
    pub name: String,
    /// 登录邮箱
    pub email: String,
    /// 商家描述
    pub description: Option<String>,
    /// 地址
    pub address: String,
    /// 纬度
    pub latitude: f64,
    /// 经度
    pub longitude: f64,
    /// 联系电话
    pub phone_number: String,
    /// 商家类别
    pub category: BusinessCategory,
    /// 图片URL列表
    pub images: serde_json::Value,
    /// 平均服务时长（分钟），等待时间估算的系数
    pub average_wait_minutes: i32,
    /// 当前排队人数缓存，恒等于活跃条目数
    pub current_queue_count: i32,
    /// 队列容量上限，活跃人数达到上限后拒绝加入
    pub max_queue_capacity: i32,
    /// 是否营业中，停业时拒绝加入队列
    pub is_active: bool,
    /// 是否已认证
    pub is_verified: bool,
    /// 营业时间
    pub operating_hours: serde_json::Value,
    /// 平均评分缓存，由评价服务维护
    pub average_rating: f64,
    /// 评价数量缓存，由评价服务维护
    pub review_count: i32,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 商家类别枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessCategory {
    /// 餐厅
    Restaurant,
    /// 酒店
    Hotel,
    /// 咖啡馆
    Cafe,
    /// 零售
    Retail,
    /// 医疗
    Healthcare,
    /// 政务
    Government,
    /// 其他
    #[default]
    Other,
}

impl BusinessCategory {
    /// 所有类别，目录接口用于枚举
    pub fn all() -> &'static [BusinessCategory] {
        &[
            BusinessCategory::Restaurant,
            BusinessCategory::Hotel,
            BusinessCategory::Cafe,
            BusinessCategory::Retail,
            BusinessCategory::Healthcare,
            BusinessCategory::Government,
            BusinessCategory::Other,
        ]
    }

    /// 展示用标签，首字母大写
    pub fn label(&self) -> String {
        let key = self.to_string();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => key,
        }
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BusinessCategory::Restaurant => write!(f, "restaurant"),
            BusinessCategory::Hotel => write!(f, "hotel"),
            BusinessCategory::Cafe => write!(f, "cafe"),
            BusinessCategory::Retail => write!(f, "retail"),
            BusinessCategory::Healthcare => write!(f, "healthcare"),
            BusinessCategory::Government => write!(f, "government"),
            BusinessCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for BusinessCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(BusinessCategory::Restaurant),
            "hotel" => Ok(BusinessCategory::Hotel),
            "cafe" => Ok(BusinessCategory::Cafe),
            "retail" => Ok(BusinessCategory::Retail),
            "healthcare" => Ok(BusinessCategory::Healthcare),
            "government" => Ok(BusinessCategory::Government),
            "other" => Ok(BusinessCategory::Other),
            _ => Err(()),
        }
    }
}

impl Business {
    /// 判断队列是否已满
    pub fn is_full(&self) -> bool {
        self.current_queue_count >= self.max_queue_capacity
    }
}
