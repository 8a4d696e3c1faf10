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

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    application::{
        dto::task_request::{
            CreateSubtaskRequestDto, CreateTaskRequestDto, MessageResponseDto,
            UpdateStatusRequestDto,
        },
        use_cases::task_use_case::TaskUseCase,
    },
    domain::repositories::task_repository::TaskRepository,
    presentation::{errors::AppError, extractors::current_user::CurrentUser},
};

/// 创建任务
pub async fn create_task<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateTaskRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    let task = use_case.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// 获取当前用户的全部任务
pub async fn list_tasks<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    let tasks = use_case.fetch(user_id).await?;
    Ok(Json(tasks))
}

/// 更新任务状态
pub async fn update_task_status<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateStatusRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    use_case
        .update_status(task_id, user_id, payload.status)
        .await?;
    Ok(Json(MessageResponseDto::new("Task updated")))
}

/// 删除任务及其子任务
pub async fn delete_task<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
    Path(task_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    use_case.delete(task_id, user_id).await?;
    Ok(Json(MessageResponseDto::new("Task deleted")))
}

/// 为任务添加子任务
pub async fn add_subtask<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
    Path(task_id): Path<i64>,
    Json(payload): Json<CreateSubtaskRequestDto>,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    let subtask = use_case.add_subtask(task_id, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

/// 切换子任务完成状态
pub async fn toggle_subtask<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
    Path(subtask_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    use_case.toggle_subtask(subtask_id, user_id).await?;
    Ok(Json(MessageResponseDto::new("Subtask toggled")))
}

pub async fn delete_subtask<R>(
    Extension(use_case): Extension<Arc<TaskUseCase<R>>>,
    CurrentUser(user_id): CurrentUser,
    Path(subtask_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    R: TaskRepository + 'static,
{
    use_case.delete_subtask(subtask_id, user_id).await?;
    Ok(Json(MessageResponseDto::new("Subtask deleted")))
}
