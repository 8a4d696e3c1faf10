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

use crate::{
    application::dto::task_request::{CreateSubtaskRequestDto, CreateTaskRequestDto},
    domain::{
        models::task::{to_utc, RecurrenceRule, Subtask, Task, TaskStatus},
        repositories::task_repository::{RepositoryError, TaskRepository},
        services::recurrence,
    },
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

#[derive(Error, Debug)]
pub enum TaskUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("task not found")]
    TaskNotFound,
    #[error("subtask not found")]
    SubtaskNotFound,
    #[error("unauthorized: you don't own this task")]
    Forbidden,
    #[error("Request timed out")]
    Timeout,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 任务与子任务用例
///
/// 所有写操作都先校验任务归属，每次调用受 `timeout` 限制
pub struct TaskUseCase<R> {
    task_repo: Arc<R>,
    timeout: Duration,
}

impl<R> TaskUseCase<R>
where
    R: TaskRepository + 'static,
{
    pub fn new(task_repo: Arc<R>, timeout: Duration) -> Self {
        Self { task_repo, timeout }
    }

    async fn within<T, F>(&self, fut: F) -> Result<T, TaskUseCaseError>
    where
        F: Future<Output = Result<T, TaskUseCaseError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| TaskUseCaseError::Timeout)?
    }

    async fn owned_task(&self, task_id: i64, owner_id: i64) -> Result<Task, TaskUseCaseError> {
        let task = self
            .task_repo
            .find_by_id(task_id)
            .await?
            .ok_or(TaskUseCaseError::TaskNotFound)?;

        if task.owner_id != owner_id {
            return Err(TaskUseCaseError::Forbidden);
        }
        Ok(task)
    }

    async fn owned_subtask(
        &self,
        subtask_id: i64,
        owner_id: i64,
    ) -> Result<Subtask, TaskUseCaseError> {
        let subtask = self
            .task_repo
            .find_subtask(subtask_id)
            .await?
            .ok_or(TaskUseCaseError::SubtaskNotFound)?;

        self.owned_task(subtask.task_id, owner_id).await?;
        Ok(subtask)
    }

    /// 创建任务
    ///
    /// 设置了周期规则但没有给出 `next_trigger` 时，首次触发时间为创建时间推进一个周期
    pub async fn create(
        &self,
        owner_id: i64,
        dto: CreateTaskRequestDto,
    ) -> Result<Task, TaskUseCaseError> {
        dto.validate()
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;
        let rule = RecurrenceRule::parse_optional(dto.recurrence_rule.as_deref())
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;

        let mut task = Task::new(owner_id, dto.title.trim().to_string());
        task.description = dto.description;
        task.status = dto.status.unwrap_or_default();
        task.priority = dto.priority.unwrap_or_default();
        task.labels = dto.labels;
        task.reminder_time = dto.reminder_time.map(to_utc);
        task.recurrence_rule = rule;
        task.next_trigger = rule.map(|rule| {
            to_utc(
                dto.next_trigger
                    .unwrap_or_else(|| recurrence::advance(task.created_at, rule)),
            )
        });

        let created = self
            .within(async { Ok(self.task_repo.create(&task).await?) })
            .await?;
        debug!(task_id = created.id, owner_id, "Task created");
        Ok(created)
    }

    /// 获取用户的全部任务（含子任务）
    pub async fn fetch(&self, owner_id: i64) -> Result<Vec<Task>, TaskUseCaseError> {
        self.within(async { Ok(self.task_repo.find_by_owner(owner_id).await?) })
            .await
    }

    pub async fn update_status(
        &self,
        task_id: i64,
        owner_id: i64,
        status: TaskStatus,
    ) -> Result<(), TaskUseCaseError> {
        self.within(async {
            let mut task = self.owned_task(task_id, owner_id).await?;
            task.set_status(status);
            self.task_repo.update(&task).await?;
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, task_id: i64, owner_id: i64) -> Result<(), TaskUseCaseError> {
        self.within(async {
            self.owned_task(task_id, owner_id).await?;
            self.task_repo.delete(task_id).await?;
            Ok(())
        })
        .await
    }

    pub async fn add_subtask(
        &self,
        task_id: i64,
        owner_id: i64,
        dto: CreateSubtaskRequestDto,
    ) -> Result<Subtask, TaskUseCaseError> {
        dto.validate()
            .map_err(|e| TaskUseCaseError::ValidationError(e.to_string()))?;

        self.within(async {
            self.owned_task(task_id, owner_id).await?;
            Ok(self
                .task_repo
                .create_subtask(task_id, dto.title.trim())
                .await?)
        })
        .await
    }

    pub async fn toggle_subtask(
        &self,
        subtask_id: i64,
        owner_id: i64,
    ) -> Result<(), TaskUseCaseError> {
        self.within(async {
            self.owned_subtask(subtask_id, owner_id).await?;
            self.task_repo.toggle_subtask(subtask_id).await?;
            Ok(())
        })
        .await
    }

    pub async fn delete_subtask(
        &self,
        subtask_id: i64,
        owner_id: i64,
    ) -> Result<(), TaskUseCaseError> {
        self.within(async {
            self.owned_subtask(subtask_id, owner_id).await?;
            self.task_repo.delete_subtask(subtask_id).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "task_use_case_test.rs"]
mod tests;
