// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::queue_request::{
    AdvanceRequestDto, JoinQueueRequestDto, QueueEntryDto, QueueListQueryDto, UpdateNotesRequestDto,
};
use crate::application::dto::ApiResponse;
use crate::domain::repositories::queue_repository::QueueQueryParams;
use crate::domain::services::queue_ledger::{QueueLedger, QueueStats, WaitEstimate};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::current_user::CurrentUser;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列表默认页大小
const DEFAULT_PAGE_SIZE: u64 = 10;
/// 列表最大页大小
const MAX_PAGE_SIZE: u64 = 100;

/// 加入队列处理器
pub async fn join_queue(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<JoinQueueRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<QueueEntryDto>>), AppError> {
    let entry = ledger.join(request.business_id, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            QueueEntryDto::from(&entry),
            "Successfully joined the queue",
        )),
    ))
}

/// 离开队列处理器
pub async fn leave_queue(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    ledger.leave(entry_id, user_id).await?;

    Ok(Json(ApiResponse::message_only(
        "Successfully left the queue",
    )))
}

/// 推进条目状态处理器（商家侧）
pub async fn advance_queue_entry(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    Path(entry_id): Path<Uuid>,
    Json(request): Json<AdvanceRequestDto>,
) -> Result<Json<ApiResponse<QueueEntryDto>>, AppError> {
    let entry = ledger.advance(entry_id, request.to_status).await?;

    Ok(Json(ApiResponse::success(QueueEntryDto::from(&entry))))
}

/// 用户历史队列列表处理器
pub async fn my_queues(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<QueueListQueryDto>,
) -> Result<Json<ApiResponse<Vec<QueueEntryDto>>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let (entries, total) = ledger
        .list_for_user(QueueQueryParams {
            user_id,
            status: query.status,
            limit,
            offset: (page - 1) * limit,
        })
        .await?;

    let entries: Vec<QueueEntryDto> = entries.iter().map(QueueEntryDto::from).collect();
    Ok(Json(ApiResponse::paginated(entries, page, limit, total)))
}

/// 当前活跃队列处理器
pub async fn current_queue(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<QueueEntryDto>>, AppError> {
    match ledger.current_for_user(user_id).await? {
        Some(entry) => Ok(Json(ApiResponse::success(QueueEntryDto::from(&entry)))),
        None => Ok(Json(ApiResponse {
            success: true,
            data: None,
            message: Some("No active queue found".to_string()),
            pagination: None,
        })),
    }
}

/// 查询单个条目处理器
pub async fn get_queue_entry(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<ApiResponse<QueueEntryDto>>, AppError> {
    let entry = ledger.get_for_user(entry_id, user_id).await?;

    Ok(Json(ApiResponse::success(QueueEntryDto::from(&entry))))
}

/// 更新条目备注处理器
pub async fn update_queue_notes(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Path(entry_id): Path<Uuid>,
    Json(request): Json<UpdateNotesRequestDto>,
) -> Result<Json<ApiResponse<QueueEntryDto>>, AppError> {
    request.validate()?;

    let entry = ledger.update_notes(entry_id, user_id, request.notes).await?;

    Ok(Json(ApiResponse::success_with_message(
        QueueEntryDto::from(&entry),
        "Queue notes updated successfully",
    )))
}

/// 商家队列统计处理器
pub async fn queue_stats(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<ApiResponse<QueueStats>>, AppError> {
    let stats = ledger.stats(business_id).await?;

    Ok(Json(ApiResponse::success(stats)))
}

/// 等待时间估算处理器
pub async fn wait_estimate(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<ApiResponse<WaitEstimate>>, AppError> {
    let estimate = ledger.estimate(business_id).await?;

    Ok(Json(ApiResponse::success(estimate)))
}

/// 商家活跃队列列表处理器
pub async fn active_entries(
    Extension(ledger): Extension<Arc<QueueLedger>>,
    Path(business_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<QueueEntryDto>>>, AppError> {
    let entries = ledger.list_active_for_business(business_id).await?;

    let entries: Vec<QueueEntryDto> = entries.iter().map(QueueEntryDto::from).collect();
    Ok(Json(ApiResponse::success(entries)))
}
