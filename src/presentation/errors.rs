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
use tracing::error;

use crate::application::use_cases::{task_use_case::TaskUseCaseError, user_use_case::AuthError};
use crate::domain::repositories::task_repository::RepositoryError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按具体错误类型选择HTTP状态码
#[derive(Debug)]
pub struct AppError(anyhow::Error);

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<TaskUseCaseError>() {
            return match err {
                TaskUseCaseError::ValidationError(_) => StatusCode::BAD_REQUEST,
                TaskUseCaseError::TaskNotFound | TaskUseCaseError::SubtaskNotFound => {
                    StatusCode::NOT_FOUND
                }
                TaskUseCaseError::Forbidden => StatusCode::FORBIDDEN,
                TaskUseCaseError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                TaskUseCaseError::Repository(e) => repository_status(e),
            };
        }

        if let Some(err) = self.0.downcast_ref::<AuthError>() {
            return match err {
                AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                AuthError::Repository(e) => repository_status(e),
                AuthError::Password(_) | AuthError::Token(_) | AuthError::Worker(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(err) => repository_status(err),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log
        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:#}", self.0);
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": error_message }));
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
