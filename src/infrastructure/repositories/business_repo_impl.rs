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
use crate::domain::repositories::business_repository::{
    BusinessQueryParams, BusinessRepository, RepositoryError,
};
use crate::infrastructure::database::entities::business as business_entity;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

/// 商家目录仓库实现
///
/// 基于SeaORM实现的商家目录数据访问层。所有查询只返回营业中的
/// 商家；队列投影字段在这里只读。
#[derive(Clone)]
pub struct BusinessRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl BusinessRepositoryImpl {
    /// 创建新的商家目录仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<business_entity::Model> for Business {
    fn from(model: business_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            description: model.description,
            address: model.address,
            latitude: model.latitude,
            longitude: model.longitude,
            phone_number: model.phone_number,
            category: model.category.parse().unwrap_or_default(),
            images: model.images,
            average_wait_minutes: model.average_wait_minutes,
            current_queue_count: model.current_queue_count,
            max_queue_capacity: model.max_queue_capacity,
            is_active: model.is_active,
            is_verified: model.is_verified,
            operating_hours: model.operating_hours,
            average_rating: model.average_rating,
            review_count: model.review_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl BusinessRepository for BusinessRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, RepositoryError> {
        let model = business_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(
        &self,
        params: BusinessQueryParams,
    ) -> Result<(Vec<Business>, u64), RepositoryError> {
        let mut query = business_entity::Entity::find()
            .filter(business_entity::Column::IsActive.eq(true));

        if let Some(category) = params.category {
            query = query.filter(business_entity::Column::Category.eq(category.to_string()));
        }

        if let Some(search) = params.search.filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(business_entity::Column::Name.like(pattern.clone()))
                    .add(business_entity::Column::Description.like(pattern)),
            );
        }

        let total = query.clone().count(self.db.as_ref()).await?;

        let models = query
            .order_by_desc(business_entity::Column::CreatedAt)
            .limit(params.limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Business::from).collect(), total))
    }

    async fn search(
        &self,
        query_text: &str,
        category: Option<BusinessCategory>,
        limit: u64,
    ) -> Result<Vec<Business>, RepositoryError> {
        let pattern = format!("%{}%", query_text);
        let mut query = business_entity::Entity::find()
            .filter(business_entity::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(business_entity::Column::Name.like(pattern.clone()))
                    .add(business_entity::Column::Description.like(pattern)),
            );

        if let Some(category) = category {
            query = query.filter(business_entity::Column::Category.eq(category.to_string()));
        }

        let models = query
            .order_by_desc(business_entity::Column::AverageRating)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Business::from).collect())
    }
}
