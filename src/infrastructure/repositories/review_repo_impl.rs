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

use crate::domain::models::review::Review;
use crate::domain::repositories::business_repository::RepositoryError;
use crate::domain::repositories::review_repository::{
    RatingDistribution, ReviewRepository, ReviewUpdate, ReviewWithAuthor,
};
use crate::infrastructure::database::entities::business as business_entity;
use crate::infrastructure::database::entities::review as review_entity;
use crate::infrastructure::database::entities::user as user_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 评价仓库实现
///
/// 创建、更新与删除评价都会在同一事务内重算商家的
/// average_rating 与 review_count 缓存。
#[derive(Clone)]
pub struct ReviewRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ReviewRepositoryImpl {
    /// 创建新的评价仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 在事务内重算商家评分缓存
    async fn recompute_business_rating(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let ratings: Vec<i32> = review_entity::Entity::find()
            .filter(review_entity::Column::BusinessId.eq(business_id))
            .select_only()
            .column(review_entity::Column::Rating)
            .into_tuple()
            .all(txn)
            .await?;

        let count = ratings.len() as i32;
        let average = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<i32>() as f64 / ratings.len() as f64
        };

        business_entity::Entity::update_many()
            .col_expr(business_entity::Column::AverageRating, Expr::value(average))
            .col_expr(business_entity::Column::ReviewCount, Expr::value(count))
            .col_expr(
                business_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(business_entity::Column::Id.eq(business_id))
            .exec(txn)
            .await?;

        Ok(())
    }
}

impl From<review_entity::Model> for Review {
    fn from(model: review_entity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            business_id: model.business_id,
            queue_entry_id: model.queue_entry_id,
            rating: model.rating,
            comment: model.comment,
            is_verified: model.is_verified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Review> for review_entity::ActiveModel {
    fn from(review: Review) -> Self {
        Self {
            id: Set(review.id),
            user_id: Set(review.user_id),
            business_id: Set(review.business_id),
            queue_entry_id: Set(review.queue_entry_id),
            rating: Set(review.rating),
            comment: Set(review.comment),
            is_verified: Set(review.is_verified),
            created_at: Set(review.created_at),
            updated_at: Set(review.updated_at),
        }
    }
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryImpl {
    async fn create(&self, review: &Review) -> Result<Review, RepositoryError> {
        let txn = self.db.begin().await?;

        let model: review_entity::ActiveModel = review.clone().into();
        model.insert(&txn).await?;

        self.recompute_business_rating(&txn, review.business_id)
            .await?;

        txn.commit().await?;
        Ok(review.clone())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, RepositoryError> {
        let model = review_entity::Entity::find_by_id(id)
            .filter(review_entity::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_for_business(
        &self,
        business_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<ReviewWithAuthor>, u64, RatingDistribution), RepositoryError> {
        let base = review_entity::Entity::find()
            .filter(review_entity::Column::BusinessId.eq(business_id));

        let total = base.clone().count(self.db.as_ref()).await?;

        let models = base
            .order_by_desc(review_entity::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        // Author names in one batched lookup instead of a join per row
        let user_ids: Vec<Uuid> = models.iter().map(|m| m.user_id).collect();
        let authors: HashMap<Uuid, String> = user_entity::Entity::find()
            .filter(user_entity::Column::Id.is_in(user_ids))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|u| (u.id, format!("{} {}", u.first_name, u.last_name)))
            .collect();

        let reviews = models
            .into_iter()
            .map(|model| {
                let author_name = authors
                    .get(&model.user_id)
                    .cloned()
                    .unwrap_or_else(|| "Anonymous".to_string());
                ReviewWithAuthor {
                    review: model.into(),
                    author_name,
                }
            })
            .collect();

        let ratings: Vec<i32> = review_entity::Entity::find()
            .filter(review_entity::Column::BusinessId.eq(business_id))
            .select_only()
            .column(review_entity::Column::Rating)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        let distribution: RatingDistribution = (1..=5)
            .map(|r| (r, ratings.iter().filter(|&&v| v == r).count() as i64))
            .collect();

        Ok((reviews, total, distribution))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Review>, u64), RepositoryError> {
        let base = review_entity::Entity::find()
            .filter(review_entity::Column::UserId.eq(user_id));

        let total = base.clone().count(self.db.as_ref()).await?;

        let models = base
            .order_by_desc(review_entity::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Review::from).collect(), total))
    }

    async fn exists_for_user_business(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let count = review_entity::Entity::find()
            .filter(review_entity::Column::UserId.eq(user_id))
            .filter(review_entity::Column::BusinessId.eq(business_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: ReviewUpdate,
    ) -> Result<Review, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = review_entity::Entity::find_by_id(id)
            .filter(review_entity::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let business_id = model.business_id;
        let mut active: review_entity::ActiveModel = model.into();
        if let Some(rating) = update.rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = update.comment {
            active.comment = Set(Some(comment));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;

        self.recompute_business_rating(&txn, business_id).await?;

        txn.commit().await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let model = review_entity::Entity::find_by_id(id)
            .filter(review_entity::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let business_id = model.business_id;
        model.delete(&txn).await?;

        self.recompute_business_rating(&txn, business_id).await?;

        txn.commit().await?;
        Ok(())
    }
}
