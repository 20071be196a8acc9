// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 连续登录失败多少次后锁定账户
pub const MAX_FAILED_LOGIN_ATTEMPTS: i32 = 5;
/// 账户锁定时长（分钟）
pub const LOCKOUT_MINUTES: i64 = 30;
/// 访问令牌有效期（天）
const ACCESS_TOKEN_DAYS: i64 = 7;
/// 刷新令牌有效期（天）
const REFRESH_TOKEN_DAYS: i64 = 30;

/// 认证错误类型
#[derive(Error, Debug)]
pub enum AuthError {
    /// 邮箱或密码不正确
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// 账户因连续登录失败被锁定
    #[error("Account is temporarily locked")]
    AccountLocked,
    /// 令牌无效或已过期
    #[error("Invalid or expired token")]
    InvalidToken,
    /// 密码哈希失败
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    /// 令牌编码/解码失败
    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT 载荷
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 用户ID
    pub sub: String,
    /// 用户邮箱
    pub email: String,
    /// 过期时间（Unix 秒）
    pub exp: i64,
}

/// 认证服务
///
/// 负责密码哈希校验与 JWT 访问/刷新令牌的签发和验证。
/// 访问令牌与刷新令牌使用不同的密钥。
pub struct AuthService {
    jwt_secret: String,
    jwt_refresh_secret: String,
    bcrypt_cost: u32,
}

impl AuthService {
    /// 创建新的认证服务实例
    pub fn new(jwt_secret: String, jwt_refresh_secret: String, bcrypt_cost: u32) -> Self {
        Self {
            jwt_secret,
            jwt_refresh_secret,
            bcrypt_cost,
        }
    }

    /// 哈希密码
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    /// 校验密码
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// 签发访问令牌
    pub fn issue_access_token(&self, user: &User) -> Result<String, AuthError> {
        self.issue(user, &self.jwt_secret, ACCESS_TOKEN_DAYS)
    }

    /// 签发刷新令牌
    pub fn issue_refresh_token(&self, user: &User) -> Result<String, AuthError> {
        self.issue(user, &self.jwt_refresh_secret, REFRESH_TOKEN_DAYS)
    }

    /// 验证访问令牌并返回用户ID
    pub fn verify_access_token(&self, token: &str) -> Result<(Uuid, Claims), AuthError> {
        self.verify(token, &self.jwt_secret)
    }

    /// 验证刷新令牌并返回用户ID
    pub fn verify_refresh_token(&self, token: &str) -> Result<(Uuid, Claims), AuthError> {
        self.verify(token, &self.jwt_refresh_secret)
    }

    fn issue(&self, user: &User, secret: &str, days: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: (Utc::now() + Duration::days(days)).timestamp(),
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?)
    }

    fn verify(&self, token: &str, secret: &str) -> Result<(Uuid, Claims), AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        let user_id = data
            .claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidToken)?;
        Ok((user_id, data.claims))
    }
}

#[cfg(test)]
#[path = "auth_service_test.rs"]
mod tests;
