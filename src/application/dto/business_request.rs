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

use crate::domain::models::business::{Business, BusinessCategory};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 目录列表查询参数
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListQueryDto {
    pub category: Option<BusinessCategory>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 轻量搜索查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSearchQueryDto {
    pub q: String,
    pub category: Option<BusinessCategory>,
    pub limit: Option<u64>,
}

/// 商家目录响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: String,
    pub category: BusinessCategory,
    pub images: serde_json::Value,
    pub average_wait_minutes: i32,
    pub current_queue_count: i32,
    pub max_queue_capacity: i32,
    pub operating_hours: serde_json::Value,
    pub average_rating: f64,
    pub review_count: i32,
    pub created_at: DateTime<FixedOffset>,
}

impl From<&Business> for BusinessDto {
    fn from(business: &Business) -> Self {
        Self {
            id: business.id,
            name: business.name.clone(),
            description: business.description.clone(),
            address: business.address.clone(),
            latitude: business.latitude,
            longitude: business.longitude,
            phone_number: business.phone_number.clone(),
            category: business.category,
            images: business.images.clone(),
            average_wait_minutes: business.average_wait_minutes,
            current_queue_count: business.current_queue_count,
            max_queue_capacity: business.max_queue_capacity,
            operating_hours: business.operating_hours.clone(),
            average_rating: business.average_rating,
            review_count: business.review_count,
            created_at: business.created_at,
        }
    }
}

/// 类别响应
#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub key: String,
    pub label: String,
}
