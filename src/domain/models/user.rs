// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
///
/// 消费端账户，包含认证凭据、邮箱验证与密码重置令牌、
/// 登录失败锁定计数以及推荐码。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一标识符
    pub id: Uuid,
    /// 登录邮箱，全局唯一
    pub email: String,
    /// bcrypt 密码哈希，永不出现在响应中
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
    /// 手机号
    pub phone_number: Option<String>,
    /// 头像URL
    pub profile_image: Option<String>,
    /// 邮箱是否已验证
    pub is_email_verified: bool,
    /// 邮箱验证令牌
    pub email_verification_token: Option<String>,
    /// 邮箱验证令牌过期时间
    pub email_verification_expires_at: Option<DateTime<FixedOffset>>,
    /// 密码重置令牌
    pub password_reset_token: Option<String>,
    /// 密码重置令牌过期时间
    pub password_reset_expires_at: Option<DateTime<FixedOffset>>,
    /// 连续登录失败次数
    pub failed_login_attempts: i32,
    /// 账户锁定截止时间
    pub locked_until: Option<DateTime<FixedOffset>>,
    /// 推荐码，8位大写字母数字，全局唯一
    pub referral_code: String,
    /// 账户是否可用
    pub is_active: bool,
    /// 最近登录时间
    pub last_login_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl User {
    /// 创建一个新用户
    ///
    /// 推荐码与验证令牌由调用方生成后传入。
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone_number: Option<String>,
        referral_code: String,
    ) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            phone_number,
            profile_image: None,
            is_email_verified: false,
            email_verification_token: None,
            email_verification_expires_at: None,
            password_reset_token: None,
            password_reset_expires_at: None,
            failed_login_attempts: 0,
            locked_until: None,
            referral_code,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 全名，响应拼装用
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 判断账户当前是否被锁定
    pub fn is_locked(&self) -> bool {
        match self.locked_until {
            Some(until) => until > Utc::now(),
            None => false,
        }
    }
}
