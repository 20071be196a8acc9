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

use crate::domain::models::subscription::{
    PassStatus, PaymentMethod, Subscription, SubscriptionPlan, SubscriptionStatus, UserPass,
};
use crate::domain::repositories::subscription_repository::PassUsageRecord;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 购买订阅请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSubscriptionRequestDto {
    pub plan_type: SubscriptionPlan,
    pub payment_method: PaymentMethod,
}

/// 使用插队通行证请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseSkipPassRequestDto {
    pub business_id: Uuid,
    pub queue_entry_id: Uuid,
}

/// 使用历史查询参数
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageHistoryQueryDto {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 订阅计划响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDto {
    pub plan_type: SubscriptionPlan,
    pub amount: f64,
    pub currency: String,
    pub duration_days: i64,
    pub description: String,
}

/// 订阅响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    pub id: Uuid,
    pub plan_type: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<FixedOffset>,
}

impl From<&Subscription> for SubscriptionDto {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: subscription.id,
            plan_type: subscription.plan_type,
            status: subscription.status,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            amount: subscription.amount,
            currency: subscription.currency.clone(),
            payment_method: subscription.payment_method,
            created_at: subscription.created_at,
        }
    }
}

/// 通行证响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPassDto {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub pass_type: String,
    pub status: PassStatus,
    pub expires_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<FixedOffset>>,
}

impl From<&UserPass> for UserPassDto {
    fn from(pass: &UserPass) -> Self {
        Self {
            id: pass.id,
            subscription_id: pass.subscription_id,
            pass_type: pass.pass_type.clone(),
            status: pass.status,
            expires_at: pass.expires_at,
            used_at: pass.used_at,
        }
    }
}

/// 使用审计响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassUsageDto {
    pub id: Uuid,
    pub business_id: Uuid,
    pub queue_entry_id: Uuid,
    pub pass_type: String,
    pub used_at: DateTime<FixedOffset>,
}

impl From<&PassUsageRecord> for PassUsageDto {
    fn from(usage: &PassUsageRecord) -> Self {
        Self {
            id: usage.id,
            business_id: usage.business_id,
            queue_entry_id: usage.queue_entry_id,
            pass_type: usage.pass_type.clone(),
            used_at: usage.used_at,
        }
    }
}
