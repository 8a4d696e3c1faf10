// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{DueTask, Subtask, Task, TaskClone};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突
    #[error("Record already exists")]
    Conflict,
    /// 调用超过截止时间
    #[error("Store call timed out")]
    Timeout,
}

/// 任务仓库特质
///
/// 定义任务与子任务的增删改查接口，所有查询均以所有者为范围
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 创建新任务，返回带有分配ID的任务
    async fn create(&self, task: &Task) -> Result<Task, RepositoryError>;
    /// 获取某用户的全部任务（含子任务），按创建时间倒序
    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, RepositoryError>;
    /// 根据ID查找任务（不加载子任务）
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, RepositoryError>;
    /// 更新任务
    async fn update(&self, task: &Task) -> Result<Task, RepositoryError>;
    /// 删除任务及其子任务
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
    /// 创建子任务
    async fn create_subtask(&self, task_id: i64, title: &str) -> Result<Subtask, RepositoryError>;
    /// 根据ID查找子任务
    async fn find_subtask(&self, id: i64) -> Result<Option<Subtask>, RepositoryError>;
    /// 切换子任务完成状态
    async fn toggle_subtask(&self, id: i64) -> Result<(), RepositoryError>;
    /// 删除子任务
    async fn delete_subtask(&self, id: i64) -> Result<(), RepositoryError>;
}

/// 周期任务存储特质
///
/// 周期任务工作器只依赖这组操作，便于在测试中替换为内存实现
#[async_trait]
pub trait RecurringTaskStore: Send + Sync {
    /// 查找所有周期规则非空且 `next_trigger <= now` 的任务
    ///
    /// 返回顺序不作保证
    async fn find_due_recurring(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<DueTask>, RepositoryError>;

    /// 插入一个待处理的任务实例，返回新任务ID
    async fn insert_clone(&self, clone: &TaskClone) -> Result<i64, RepositoryError>;

    /// 更新单个任务的下一次触发时间
    ///
    /// 没有匹配行时返回 `RepositoryError::NotFound`
    async fn advance_next_trigger(
        &self,
        task_id: i64,
        next_trigger: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;

    /// 在同一事务中插入实例并推进父任务的触发时间
    ///
    /// 任一步失败时两步都不生效，返回新任务ID
    async fn clone_and_advance(
        &self,
        clone: &TaskClone,
        task_id: i64,
        next_trigger: DateTime<FixedOffset>,
    ) -> Result<i64, RepositoryError>;
}
