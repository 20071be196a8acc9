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

use crate::domain::models::user::User;
use crate::domain::repositories::business_repository::RepositoryError;
use crate::domain::repositories::user_repository::{UserProfileUpdate, UserRepository};
use crate::infrastructure::database::entities::referral as referral_entity;
use crate::infrastructure::database::entities::user as user_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 用户仓库实现
///
/// 基于SeaORM实现的用户账户数据访问层。所有写入都是固定字段集
/// 的 ActiveModel 部分更新，不做动态语句拼接。
#[derive(Clone)]
pub struct UserRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    /// 创建新的用户仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> Result<user_entity::Model, RepositoryError> {
        user_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

impl From<user_entity::Model> for User {
    fn from(model: user_entity::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            profile_image: model.profile_image,
            is_email_verified: model.is_email_verified,
            email_verification_token: model.email_verification_token,
            email_verification_expires_at: model.email_verification_expires_at,
            password_reset_token: model.password_reset_token,
            password_reset_expires_at: model.password_reset_expires_at,
            failed_login_attempts: model.failed_login_attempts,
            locked_until: model.locked_until,
            referral_code: model.referral_code,
            is_active: model.is_active,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<User> for user_entity::ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            phone_number: Set(user.phone_number),
            profile_image: Set(user.profile_image),
            is_email_verified: Set(user.is_email_verified),
            email_verification_token: Set(user.email_verification_token),
            email_verification_expires_at: Set(user.email_verification_expires_at),
            password_reset_token: Set(user.password_reset_token),
            password_reset_expires_at: Set(user.password_reset_expires_at),
            failed_login_attempts: Set(user.failed_login_attempts),
            locked_until: Set(user.locked_until),
            referral_code: Set(user.referral_code),
            is_active: Set(user.is_active),
            last_login_at: Set(user.last_login_at),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let model: user_entity::ActiveModel = user.clone().into();
        model.insert(self.db.as_ref()).await?;
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find()
            .filter(user_entity::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find()
            .filter(user_entity::Column::ReferralCode.eq(code))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find()
            .filter(user_entity::Column::EmailVerificationToken.eq(token))
            .filter(user_entity::Column::EmailVerificationExpiresAt.gt(Utc::now()))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find()
            .filter(user_entity::Column::PasswordResetToken.eq(token))
            .filter(user_entity::Column::PasswordResetExpiresAt.gt(Utc::now()))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: UserProfileUpdate,
    ) -> Result<User, RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();

        if let Some(first_name) = update.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone_number) = update.phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        if let Some(profile_image) = update.profile_image {
            active.profile_image = Set(Some(profile_image));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn record_login_failure(
        &self,
        id: Uuid,
        attempts: i32,
        locked_until: Option<DateTime<FixedOffset>>,
    ) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.failed_login_attempts = Set(attempts);
        active.locked_until = Set(locked_until);
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn record_login_success(&self, id: Uuid) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.failed_login_attempts = Set(0);
        active.locked_until = Set(None);
        active.last_login_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.password_reset_token = Set(Some(token.to_string()));
        active.password_reset_expires_at = Set(Some(expires_at));
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.password_hash = Set(password_hash.to_string());
        active.password_reset_token = Set(None);
        active.password_reset_expires_at = Set(None);
        active.failed_login_attempts = Set(0);
        active.locked_until = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.email_verification_token = Set(Some(token.to_string()));
        active.email_verification_expires_at = Set(Some(expires_at));
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn mark_email_verified(&self, id: Uuid) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.is_email_verified = Set(true);
        active.email_verification_token = Set(None);
        active.email_verification_expires_at = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn change_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepositoryError> {
        let model = self.find_model(id).await?;
        let mut active: user_entity::ActiveModel = model.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn create_referral(
        &self,
        referrer_id: Uuid,
        referee_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let referral = referral_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            referrer_id: Set(referrer_id),
            referee_id: Set(Some(referee_id)),
            status: Set("pending".to_string()),
            created_at: Set(Utc::now().into()),
        };
        referral.insert(self.db.as_ref()).await?;
        Ok(())
    }
}
