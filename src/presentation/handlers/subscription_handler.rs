// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::subscription_request::{
    PassUsageDto, PlanDto, PurchaseSubscriptionRequestDto, SubscriptionDto, UsageHistoryQueryDto,
    UseSkipPassRequestDto, UserPassDto,
};
use crate::application::dto::ApiResponse;
use crate::domain::models::subscription::{
    PassStatus, Subscription, SubscriptionPlan, SubscriptionStatus, UserPass,
};
use crate::domain::models::DomainError;
use crate::domain::repositories::subscription_repository::{
    PassUsageRecord, SubscriptionRepository,
};
use crate::domain::services::queue_ledger::QueueLedger;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::current_user::CurrentUser;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 使用历史默认页大小
const DEFAULT_PAGE_SIZE: u64 = 20;
/// 使用历史最大页大小
const MAX_PAGE_SIZE: u64 = 100;

/// 计划目录，金额与时长的唯一数据源
fn plan_catalog() -> Vec<PlanDto> {
    vec![
        PlanDto {
            plan_type: SubscriptionPlan::OneTime,
            amount: 15.00,
            currency: "USD".to_string(),
            duration_days: 30,
            description: "One skip-the-line pass, valid for 30 days".to_string(),
        },
        PlanDto {
            plan_type: SubscriptionPlan::Monthly,
            amount: 29.99,
            currency: "USD".to_string(),
            duration_days: 30,
            description: "Unlimited skips for one month".to_string(),
        },
        PlanDto {
            plan_type: SubscriptionPlan::Yearly,
            amount: 299.99,
            currency: "USD".to_string(),
            duration_days: 365,
            description: "Unlimited skips for one year".to_string(),
        },
    ]
}

/// 计划列表处理器
pub async fn get_plans() -> Json<ApiResponse<Vec<PlanDto>>> {
    Json(ApiResponse::success(plan_catalog()))
}

/// 购买订阅处理器
///
/// 单次计划同时发放一张通行证；支付只做本地记账。
pub async fn purchase_subscription<S: SubscriptionRepository>(
    Extension(subscription_repo): Extension<Arc<S>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<PurchaseSubscriptionRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubscriptionDto>>), AppError> {
    let plan = plan_catalog()
        .into_iter()
        .find(|p| p.plan_type == request.plan_type)
        .ok_or_else(|| DomainError::ValidationError("Invalid plan".into()))?;

    let now: DateTime<FixedOffset> = Utc::now().into();
    let end_date: DateTime<FixedOffset> =
        (Utc::now() + Duration::days(plan.duration_days)).into();

    let subscription = Subscription {
        id: Uuid::new_v4(),
        user_id,
        plan_type: plan.plan_type,
        status: SubscriptionStatus::Active,
        start_date: now,
        end_date,
        amount: plan.amount,
        currency: plan.currency.clone(),
        payment_method: request.payment_method,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
    };

    let passes = if plan.plan_type == SubscriptionPlan::OneTime {
        vec![UserPass {
            id: Uuid::new_v4(),
            user_id,
            subscription_id: subscription.id,
            pass_type: "skip_pass".to_string(),
            status: PassStatus::Available,
            expires_at: end_date,
            used_at: None,
            created_at: now,
        }]
    } else {
        Vec::new()
    };

    let subscription = subscription_repo.purchase(&subscription, &passes).await?;

    tracing::info!(
        "Subscription {} purchased by user {} ({})",
        subscription.id,
        user_id,
        subscription.plan_type
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            SubscriptionDto::from(&subscription),
            "Subscription purchased successfully",
        )),
    ))
}

/// 用户订阅与通行证列表处理器
pub async fn my_subscriptions<S: SubscriptionRepository>(
    Extension(subscription_repo): Extension<Arc<S>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let subscriptions = subscription_repo.list_for_user(user_id).await?;
    let passes = subscription_repo.list_passes(user_id).await?;

    let subscriptions: Vec<SubscriptionDto> =
        subscriptions.iter().map(SubscriptionDto::from).collect();
    let passes: Vec<UserPassDto> = passes.iter().map(UserPassDto::from).collect();

    Ok(Json(ApiResponse::success(json!({
        "subscriptions": subscriptions,
        "passes": passes,
    }))))
}

/// 使用插队通行证处理器
///
/// 优先核销单次通行证；没有通行证时回退到有效的不限次数订阅。
pub async fn use_skip_pass<S: SubscriptionRepository>(
    Extension(subscription_repo): Extension<Arc<S>>,
    Extension(ledger): Extension<Arc<QueueLedger>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<UseSkipPassRequestDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    // The entry being skipped must belong to the caller
    let entry = ledger.get_for_user(request.queue_entry_id, user_id).await?;
    if entry.business_id != request.business_id {
        return Err(DomainError::ValidationError(
            "Queue entry does not belong to this business".into(),
        )
        .into());
    }

    let (subscription_id, pass_type) = if let Some(pass) =
        subscription_repo.find_usable_pass(user_id).await?
    {
        let usage = PassUsageRecord {
            id: Uuid::new_v4(),
            user_id,
            subscription_id: pass.subscription_id,
            business_id: request.business_id,
            queue_entry_id: request.queue_entry_id,
            pass_type: pass.pass_type.clone(),
            used_at: Utc::now().into(),
        };
        subscription_repo.consume_pass(pass.id, &usage).await?;
        (pass.subscription_id, pass.pass_type)
    } else if let Some(subscription) = subscription_repo.find_active_unlimited(user_id).await? {
        let usage = PassUsageRecord {
            id: Uuid::new_v4(),
            user_id,
            subscription_id: subscription.id,
            business_id: request.business_id,
            queue_entry_id: request.queue_entry_id,
            pass_type: subscription.plan_type.to_string(),
            used_at: Utc::now().into(),
        };
        subscription_repo.record_usage(&usage).await?;
        (subscription.id, subscription.plan_type.to_string())
    } else {
        return Err(DomainError::ValidationError(
            "No active passes or subscriptions available".into(),
        )
        .into());
    };

    tracing::info!(
        "Skip pass used by user {} at business {} (subscription {})",
        user_id,
        request.business_id,
        subscription_id
    );

    Ok(Json(ApiResponse::success_with_message(
        json!({
            "passUsed": true,
            "passType": pass_type,
            "businessId": request.business_id,
        }),
        "Skip pass used successfully",
    )))
}

/// 使用历史处理器
pub async fn usage_history<S: SubscriptionRepository>(
    Extension(subscription_repo): Extension<Arc<S>>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<UsageHistoryQueryDto>,
) -> Result<Json<ApiResponse<Vec<PassUsageDto>>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let (records, total) = subscription_repo
        .usage_history(user_id, limit, (page - 1) * limit)
        .await?;

    let records: Vec<PassUsageDto> = records.iter().map(PassUsageDto::from).collect();
    Ok(Json(ApiResponse::paginated(records, page, limit, total)))
}

/// 取消订阅处理器
pub async fn cancel_subscription<S: SubscriptionRepository>(
    Extension(subscription_repo): Extension<Arc<S>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubscriptionDto>>, AppError> {
    let subscription = subscription_repo.cancel(id, user_id).await?;

    tracing::info!("Subscription {} cancelled by user {}", id, user_id);

    Ok(Json(ApiResponse::success_with_message(
        SubscriptionDto::from(&subscription),
        "Subscription cancelled successfully",
    )))
}
