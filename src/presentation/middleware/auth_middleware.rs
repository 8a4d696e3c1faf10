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

use crate::presentation::extractors::current_user::CurrentUser;
use crate::utils::token::TokenService;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    /// 访问令牌服务
    pub tokens: Arc<TokenService>,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}

/// 认证中间件
///
/// 校验 `Authorization: Bearer <token>`，通过后把 `CurrentUser` 写入请求扩展
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("missing bearer token"))?;

    match state.tokens.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser(claims.user_id));
            Ok(next.run(req).await)
        }
        Err(e) => {
            debug!("Rejected access token on {}: {}", req.uri().path(), e);
            Err(unauthorized("invalid or expired token"))
        }
    }
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
