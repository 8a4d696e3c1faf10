// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::{task_use_case::TaskUseCase, user_use_case::UserUseCase};
use crate::domain::repositories::{task_repository::TaskRepository, user_repository::UserRepository};
use crate::presentation::handlers::{auth_handler, task_handler};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use crate::utils::token::TokenService;
use axum::{
    http::Method,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// `/health`、`/version`、`/register` 与 `/login` 无需认证，
/// 其余任务与子任务接口都要求 Bearer 令牌
///
/// # 参数
///
/// * `user_use_case` - 用户用例
/// * `task_use_case` - 任务用例
/// * `tokens` - 访问令牌服务
pub fn routes<U, T>(
    user_use_case: Arc<UserUseCase<U>>,
    task_use_case: Arc<TaskUseCase<T>>,
    tokens: Arc<TokenService>,
) -> Router
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route("/register", post(auth_handler::register::<U>))
        .route("/login", post(auth_handler::login::<U>));

    let protected_routes = Router::new()
        .route(
            "/tasks",
            post(task_handler::create_task::<T>).get(task_handler::list_tasks::<T>),
        )
        .route(
            "/tasks/{id}",
            put(task_handler::update_task_status::<T>).delete(task_handler::delete_task::<T>),
        )
        .route("/tasks/{id}/subtasks", post(task_handler::add_subtask::<T>))
        .route(
            "/subtasks/{sub_id}",
            put(task_handler::toggle_subtask::<T>).delete(task_handler::delete_subtask::<T>),
        )
        .layer(middleware::from_fn_with_state(
            AuthState { tokens },
            auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(user_use_case))
        .layer(Extension(task_use_case))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
