// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 订阅实体
///
/// 单次计划在购买时发放一张插队通行证；月付与年付计划在
/// 有效期内不限次数。支付只做本地记账，不对接外部支付网关。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// 订阅唯一标识符
    pub id: Uuid,
    /// 归属用户ID
    pub user_id: Uuid,
    /// 订阅计划
    pub plan_type: SubscriptionPlan,
    /// 订阅状态
    pub status: SubscriptionStatus,
    /// 生效时间
    pub start_date: DateTime<FixedOffset>,
    /// 到期时间
    pub end_date: DateTime<FixedOffset>,
    /// 金额
    pub amount: f64,
    /// 币种
    pub currency: String,
    /// 支付方式
    pub payment_method: PaymentMethod,
    /// 取消时间
    pub cancelled_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 订阅计划枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    /// 单次插队，购买时发放一张通行证
    #[default]
    OneTime,
    /// 月付，不限次数
    Monthly,
    /// 年付，不限次数
    Yearly,
}

impl SubscriptionPlan {
    /// 该计划是否在有效期内不限次数
    pub fn is_unlimited(&self) -> bool {
        matches!(self, SubscriptionPlan::Monthly | SubscriptionPlan::Yearly)
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionPlan::OneTime => write!(f, "one_time"),
            SubscriptionPlan::Monthly => write!(f, "monthly"),
            SubscriptionPlan::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for SubscriptionPlan {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_time" => Ok(SubscriptionPlan::OneTime),
            "monthly" => Ok(SubscriptionPlan::Monthly),
            "yearly" => Ok(SubscriptionPlan::Yearly),
            _ => Err(()),
        }
    }
}

/// 订阅状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Inactive,
    Cancelled,
    PastDue,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Inactive => write!(f, "inactive"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            _ => Err(()),
        }
    }
}

/// 支付方式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    ApplePay,
    GooglePay,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "credit_card"),
            PaymentMethod::Paypal => write!(f, "paypal"),
            PaymentMethod::ApplePay => write!(f, "apple_pay"),
            PaymentMethod::GooglePay => write!(f, "google_pay"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            "apple_pay" => Ok(PaymentMethod::ApplePay),
            "google_pay" => Ok(PaymentMethod::GooglePay),
            _ => Err(()),
        }
    }
}

/// 插队通行证
///
/// 月付订阅购买时一次性发放，单次使用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPass {
    /// 通行证唯一标识符
    pub id: Uuid,
    /// 归属用户ID
    pub user_id: Uuid,
    /// 来源订阅ID
    pub subscription_id: Uuid,
    /// 通行证类型，与订阅计划一致
    pub pass_type: String,
    /// 通行证状态
    pub status: PassStatus,
    /// 过期时间
    pub expires_at: DateTime<FixedOffset>,
    /// 使用时间
    pub used_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

/// 通行证状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    #[default]
    Available,
    Used,
    Expired,
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PassStatus::Available => write!(f, "available"),
            PassStatus::Used => write!(f, "used"),
            PassStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for PassStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(PassStatus::Available),
            "used" => Ok(PassStatus::Used),
            "expired" => Ok(PassStatus::Expired),
            _ => Err(()),
        }
    }
}

impl UserPass {
    /// 判断通行证当前是否可用
    pub fn is_usable(&self) -> bool {
        self.status == PassStatus::Available && self.expires_at > Utc::now()
    }
}
