// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::models::DomainError;
use crate::domain::repositories::business_repository::RepositoryError;
use crate::domain::repositories::queue_repository::LedgerError;
use crate::domain::services::auth_service::AuthError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(ledger_err) = self.0.downcast_ref::<LedgerError>() {
            match ledger_err {
                LedgerError::NotFound => StatusCode::NOT_FOUND,
                LedgerError::Conflict => StatusCode::CONFLICT,
                LedgerError::Full | LedgerError::Inactive | LedgerError::InvalidState => {
                    StatusCode::BAD_REQUEST
                }
                LedgerError::TransientStore(_) => StatusCode::SERVICE_UNAVAILABLE,
                LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(repo_err) = self.0.downcast_ref::<RepositoryError>() {
            match repo_err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Duplicate => StatusCode::CONFLICT,
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(auth_err) = self.0.downcast_ref::<AuthError>() {
            match auth_err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::AccountLocked => StatusCode::LOCKED,
                AuthError::Hash(_) | AuthError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(domain_err) = self.0.downcast_ref::<DomainError>() {
            match domain_err {
                DomainError::InvalidStateTransition | DomainError::ValidationError(_) => {
                    StatusCode::BAD_REQUEST
                }
            }
        } else if self.0.downcast_ref::<validator::ValidationErrors>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "success": false, "message": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
