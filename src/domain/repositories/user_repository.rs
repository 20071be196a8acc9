// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::User;
use crate::domain::repositories::business_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 用户资料部分更新
///
/// 只有被设置的字段会写入存储，对应固定的 ActiveModel 字段集，
/// 不做任何动态拼接。
#[derive(Debug, Default, Clone)]
pub struct UserProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_image: Option<String>,
}

/// 用户仓库特质
///
/// 定义用户账户的数据访问接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建新用户
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;
    /// 根据ID查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// 根据推荐码查找用户
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, RepositoryError>;
    /// 根据邮箱验证令牌查找未过期的用户
    async fn find_by_verification_token(&self, token: &str)
        -> Result<Option<User>, RepositoryError>;
    /// 根据密码重置令牌查找未过期的用户
    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError>;
    /// 部分更新用户资料
    async fn update_profile(
        &self,
        id: Uuid,
        update: UserProfileUpdate,
    ) -> Result<User, RepositoryError>;
    /// 记录一次登录失败，必要时设置锁定截止时间
    async fn record_login_failure(
        &self,
        id: Uuid,
        attempts: i32,
        locked_until: Option<DateTime<FixedOffset>>,
    ) -> Result<(), RepositoryError>;
    /// 记录一次成功登录，清零失败计数
    async fn record_login_success(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 设置密码重置令牌
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;
    /// 用新哈希完成密码重置并清除令牌
    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError>;
    /// 设置邮箱验证令牌
    async fn set_verification_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;
    /// 标记邮箱已验证并清除令牌
    async fn mark_email_verified(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 修改密码
    async fn change_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError>;
    /// 创建一条推荐记录
    async fn create_referral(
        &self,
        referrer_id: Uuid,
        referee_id: Uuid,
    ) -> Result<(), RepositoryError>;
}
