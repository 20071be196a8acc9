// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::review_request::{
    CreateReviewRequestDto, RatingBucketDto, ReviewDto, ReviewListQueryDto, UpdateReviewRequestDto,
};
use crate::application::dto::ApiResponse;
use crate::domain::models::queue_entry::QueueStatus;
use crate::domain::models::review::Review;
use crate::domain::models::DomainError;
use crate::domain::repositories::business_repository::{BusinessRepository, RepositoryError};
use crate::domain::repositories::review_repository::{ReviewRepository, ReviewUpdate};
use crate::domain::services::queue_ledger::QueueLedger;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::current_user::CurrentUser;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列表默认页大小
const DEFAULT_PAGE_SIZE: u64 = 10;
/// 列表最大页大小
const MAX_PAGE_SIZE: u64 = 100;

/// 创建评价处理器
///
/// 关联已完成排队条目的评价标记为到店验证；条目必须属于
/// 调用方、属于被评价商家且已完成。
pub async fn create_review<R: ReviewRepository, B: BusinessRepository>(
    Extension(review_repo): Extension<Arc<R>>,
    Extension(business_repo): Extension<Arc<B>>,
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreateReviewRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), AppError> {
    request.validate()?;

    business_repo
        .find_by_id(request.business_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    if review_repo
        .exists_for_user_business(user_id, request.business_id)
        .await?
    {
        return Err(RepositoryError::Duplicate.into());
    }

    if let Some(queue_entry_id) = request.queue_entry_id {
        let entry = ledger.get_for_user(queue_entry_id, user_id).await?;
        if entry.business_id != request.business_id || entry.status != QueueStatus::Completed {
            return Err(DomainError::ValidationError(
                "Queue entry does not match a completed visit to this business".into(),
            )
            .into());
        }
    }

    let review = Review::new(
        user_id,
        request.business_id,
        request.queue_entry_id,
        request.rating,
        request.comment,
    );
    let review = review_repo.create(&review).await?;

    tracing::info!(
        "Review {} created for business {}",
        review.id,
        review.business_id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            ReviewDto::from_review(&review, None),
            "Review created successfully",
        )),
    ))
}

/// 商家评价列表处理器，附带评分分布
pub async fn list_business_reviews<R: ReviewRepository>(
    Extension(review_repo): Extension<Arc<R>>,
    Path(business_id): Path<Uuid>,
    Query(query): Query<ReviewListQueryDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let (reviews, total, distribution) = review_repo
        .list_for_business(business_id, limit, (page - 1) * limit)
        .await?;

    let reviews: Vec<ReviewDto> = reviews
        .iter()
        .map(|r| ReviewDto::from_review(&r.review, Some(r.author_name.clone())))
        .collect();
    let distribution: Vec<RatingBucketDto> = distribution
        .into_iter()
        .map(|(rating, count)| RatingBucketDto { rating, count })
        .collect();

    Ok(Json(ApiResponse::paginated(
        json!({
            "reviews": reviews,
            "ratingDistribution": distribution,
        }),
        page,
        limit,
        total,
    )))
}

/// 用户自己的评价列表处理器
pub async fn my_reviews<R: ReviewRepository>(
    Extension(review_repo): Extension<Arc<R>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ReviewListQueryDto>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let (reviews, total) = review_repo
        .list_for_user(user_id, limit, (page - 1) * limit)
        .await?;

    let reviews: Vec<ReviewDto> = reviews
        .iter()
        .map(|r| ReviewDto::from_review(r, None))
        .collect();
    Ok(Json(ApiResponse::paginated(reviews, page, limit, total)))
}

/// 更新评价处理器
pub async fn update_review<R: ReviewRepository>(
    Extension(review_repo): Extension<Arc<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReviewRequestDto>,
) -> Result<Json<ApiResponse<ReviewDto>>, AppError> {
    request.validate()?;

    let review = review_repo
        .update(
            id,
            user_id,
            ReviewUpdate {
                rating: request.rating,
                comment: request.comment,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        ReviewDto::from_review(&review, None),
        "Review updated successfully",
    )))
}

/// 删除评价处理器
pub async fn delete_review<R: ReviewRepository>(
    Extension(review_repo): Extension<Arc<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    review_repo.delete(id, user_id).await?;

    Ok(Json(ApiResponse::message_only(
        "Review deleted successfully",
    )))
}
