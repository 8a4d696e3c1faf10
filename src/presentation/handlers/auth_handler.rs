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

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::auth_request::{LoginRequestDto, RegisterRequestDto, RegisterResponseDto},
        use_cases::user_use_case::UserUseCase,
    },
    domain::repositories::user_repository::UserRepository,
    presentation::errors::AppError,
};

/// 注册新用户
pub async fn register<U>(
    Extension(use_case): Extension<Arc<UserUseCase<U>>>,
    Json(payload): Json<RegisterRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + 'static,
{
    let user_id = use_case.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponseDto {
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

/// 登录并获取访问令牌
pub async fn login<U>(
    Extension(use_case): Extension<Arc<UserUseCase<U>>>,
    Json(payload): Json<LoginRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + 'static,
{
    let response = use_case.login(payload).await?;
    Ok(Json(response))
}
