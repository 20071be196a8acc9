// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::auth_request::{
    AuthResponseDto, ChangePasswordRequestDto, ForgotPasswordRequestDto, LoginRequestDto,
    RegisterRequestDto, RefreshTokenRequestDto, ResetPasswordRequestDto, UpdateProfileRequestDto,
    UserDto, VerifyEmailRequestDto,
};
use crate::application::dto::ApiResponse;
use crate::domain::models::user::User;
use crate::domain::models::DomainError;
use crate::domain::repositories::business_repository::RepositoryError;
use crate::domain::repositories::user_repository::{UserProfileUpdate, UserRepository};
use crate::domain::services::auth_service::{
    AuthError, AuthService, LOCKOUT_MINUTES, MAX_FAILED_LOGIN_ATTEMPTS,
};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::current_user::CurrentUser;
use crate::utils::tokens::{generate_random_token, generate_referral_code};
use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;
use validator::Validate;

/// 邮箱验证令牌有效期（小时）
const VERIFICATION_TOKEN_HOURS: i64 = 24;
/// 密码重置令牌有效期（小时）
const RESET_TOKEN_HOURS: i64 = 1;

/// 注册处理器
pub async fn register<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>), AppError> {
    request.validate()?;

    if user_repo.find_by_email(&request.email).await?.is_some() {
        return Err(RepositoryError::Duplicate.into());
    }

    // Optional referral code must resolve to an existing user
    let referrer_id = match &request.referral_code {
        Some(code) => {
            let referrer = user_repo
                .find_by_referral_code(code)
                .await?
                .ok_or_else(|| DomainError::ValidationError("Invalid referral code".into()))?;
            Some(referrer.id)
        }
        None => None,
    };

    let password_hash = auth_service.hash_password(&request.password)?;
    let mut user = User::new(
        request.email,
        password_hash,
        request.first_name,
        request.last_name,
        request.phone_number,
        generate_referral_code(),
    );
    user.email_verification_token = Some(generate_random_token());
    user.email_verification_expires_at =
        Some((Utc::now() + Duration::hours(VERIFICATION_TOKEN_HOURS)).into());

    let user = user_repo.create(&user).await?;

    if let Some(referrer_id) = referrer_id {
        user_repo.create_referral(referrer_id, user.id).await?;
    }

    let access_token = auth_service.issue_access_token(&user)?;
    let refresh_token = auth_service.issue_refresh_token(&user)?;

    tracing::info!("User registered: {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            AuthResponseDto {
                user: UserDto::from(&user),
                access_token,
                refresh_token,
            },
            "User registered successfully",
        )),
    ))
}

/// 登录处理器
///
/// 连续失败 MAX_FAILED_LOGIN_ATTEMPTS 次后锁定账户
/// LOCKOUT_MINUTES 分钟。
pub async fn login<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>, AppError> {
    request.validate()?;

    let user = user_repo
        .find_by_email(&request.email)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::InvalidCredentials)?;

    if user.is_locked() {
        return Err(AuthError::AccountLocked.into());
    }

    if !auth_service.verify_password(&request.password, &user.password_hash)? {
        let attempts = user.failed_login_attempts + 1;
        let locked_until = if attempts >= MAX_FAILED_LOGIN_ATTEMPTS {
            tracing::warn!("Account locked after repeated failures: {}", user.id);
            Some((Utc::now() + Duration::minutes(LOCKOUT_MINUTES)).into())
        } else {
            None
        };
        user_repo
            .record_login_failure(user.id, attempts, locked_until)
            .await?;
        return Err(AuthError::InvalidCredentials.into());
    }

    user_repo.record_login_success(user.id).await?;

    let access_token = auth_service.issue_access_token(&user)?;
    let refresh_token = auth_service.issue_refresh_token(&user)?;

    tracing::info!("User logged in: {}", user.id);

    Ok(Json(ApiResponse::success(AuthResponseDto {
        user: UserDto::from(&user),
        access_token,
        refresh_token,
    })))
}

/// 刷新令牌处理器
pub async fn refresh_token<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>, AppError> {
    request.validate()?;

    let (user_id, _claims) = auth_service.verify_refresh_token(&request.refresh_token)?;

    let user = user_repo
        .find_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AuthError::InvalidToken)?;

    let access_token = auth_service.issue_access_token(&user)?;
    let refresh_token = auth_service.issue_refresh_token(&user)?;

    Ok(Json(ApiResponse::success(AuthResponseDto {
        user: UserDto::from(&user),
        access_token,
        refresh_token,
    })))
}

/// 忘记密码处理器
///
/// 不论邮箱是否存在都返回同样的提示，避免账户枚举。
pub async fn forgot_password<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Json(request): Json<ForgotPasswordRequestDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    request.validate()?;

    if let Some(user) = user_repo
        .find_by_email(&request.email)
        .await?
        .filter(|u| u.is_active)
    {
        let token = generate_random_token();
        let expires_at = (Utc::now() + Duration::hours(RESET_TOKEN_HOURS)).into();
        user_repo.set_reset_token(user.id, &token, expires_at).await?;
        tracing::info!("Password reset token issued for user {}", user.id);
    }

    Ok(Json(ApiResponse::message_only(
        "If the email exists, a reset link has been sent",
    )))
}

/// 重置密码处理器
pub async fn reset_password<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(request): Json<ResetPasswordRequestDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    request.validate()?;

    let user = user_repo
        .find_by_reset_token(&request.token)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    let password_hash = auth_service.hash_password(&request.new_password)?;
    user_repo.reset_password(user.id, &password_hash).await?;

    tracing::info!("Password reset for user {}", user.id);

    Ok(Json(ApiResponse::message_only(
        "Password reset successfully",
    )))
}

/// 邮箱验证处理器
pub async fn verify_email<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Json(request): Json<VerifyEmailRequestDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    request.validate()?;

    let user = user_repo
        .find_by_verification_token(&request.token)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    user_repo.mark_email_verified(user.id).await?;

    Ok(Json(ApiResponse::message_only("Email verified successfully")))
}

/// 获取资料处理器
pub async fn get_profile<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ApiResponse<UserDto>>, AppError> {
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}

/// 更新资料处理器
pub async fn update_profile<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<UpdateProfileRequestDto>,
) -> Result<Json<ApiResponse<UserDto>>, AppError> {
    request.validate()?;

    let user = user_repo
        .update_profile(
            user_id,
            UserProfileUpdate {
                first_name: request.first_name,
                last_name: request.last_name,
                phone_number: request.phone_number,
                profile_image: request.profile_image,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        UserDto::from(&user),
        "Profile updated successfully",
    )))
}

/// 修改密码处理器
pub async fn change_password<U: UserRepository>(
    Extension(user_repo): Extension<Arc<U>>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ChangePasswordRequestDto>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    request.validate()?;

    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    if !auth_service.verify_password(&request.current_password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let password_hash = auth_service.hash_password(&request.new_password)?;
    user_repo.change_password(user.id, &password_hash).await?;

    tracing::info!("Password changed for user {}", user.id);

    Ok(Json(ApiResponse::message_only(
        "Password changed successfully",
    )))
}
