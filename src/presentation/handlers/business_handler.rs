// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::business_request::{
    BusinessDto, BusinessListQueryDto, BusinessSearchQueryDto, CategoryDto,
};
use crate::application::dto::ApiResponse;
use crate::domain::models::business::BusinessCategory;
use crate::domain::repositories::business_repository::{
    BusinessQueryParams, BusinessRepository, RepositoryError,
};
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// 目录默认页大小
const DEFAULT_PAGE_SIZE: u64 = 20;
/// 目录最大页大小
const MAX_PAGE_SIZE: u64 = 100;
/// 搜索默认返回条数
const DEFAULT_SEARCH_LIMIT: u64 = 10;

/// 商家目录列表处理器
pub async fn list_businesses<B: BusinessRepository>(
    Extension(business_repo): Extension<Arc<B>>,
    Query(query): Query<BusinessListQueryDto>,
) -> Result<Json<ApiResponse<Vec<BusinessDto>>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let (businesses, total) = business_repo
        .list(BusinessQueryParams {
            category: query.category,
            search: query.search,
            limit,
            offset: (page - 1) * limit,
        })
        .await?;

    let businesses: Vec<BusinessDto> = businesses.iter().map(BusinessDto::from).collect();
    Ok(Json(ApiResponse::paginated(businesses, page, limit, total)))
}

/// 商家详情处理器
pub async fn get_business<B: BusinessRepository>(
    Extension(business_repo): Extension<Arc<B>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BusinessDto>>, AppError> {
    let business = business_repo
        .find_by_id(id)
        .await?
        .filter(|b| b.is_active)
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(ApiResponse::success(BusinessDto::from(&business))))
}

/// 商家类别处理器
pub async fn get_categories() -> Json<ApiResponse<Vec<CategoryDto>>> {
    let categories = BusinessCategory::all()
        .iter()
        .map(|category| CategoryDto {
            key: category.to_string(),
            label: category.label(),
        })
        .collect();

    Json(ApiResponse::success(categories))
}

/// 商家搜索处理器
pub async fn search_businesses<B: BusinessRepository>(
    Extension(business_repo): Extension<Arc<B>>,
    Query(query): Query<BusinessSearchQueryDto>,
) -> Result<Json<ApiResponse<Vec<BusinessDto>>>, AppError> {
    if query.q.trim().is_empty() {
        return Err(crate::domain::models::DomainError::ValidationError(
            "Search query is required".into(),
        )
        .into());
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_PAGE_SIZE);

    let businesses = business_repo
        .search(query.q.trim(), query.category, limit)
        .await?;

    let businesses: Vec<BusinessDto> = businesses.iter().map(BusinessDto::from).collect();
    Ok(Json(ApiResponse::success(businesses)))
}
