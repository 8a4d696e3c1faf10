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

use crate::domain::models::task::{
    to_utc, utc_now, DueTask, Subtask, Task, TaskClone, TaskPriority, TaskStatus,
};
use crate::domain::repositories::task_repository::{
    RecurringTaskStore, RepositoryError, TaskRepository,
};
use crate::infrastructure::database::entities::{subtask as subtask_entity, task as task_entity};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层，同时实现周期任务存储契约
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn labels_to_json(labels: &[String]) -> serde_json::Value {
    serde_json::Value::from(labels.to_vec())
}

fn labels_from_json(task_id: i64, value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(task_id, "Malformed labels column, treating as empty: {}", e);
        Vec::new()
    })
}

fn status_from_column(task_id: i64, value: &str) -> TaskStatus {
    value.parse().unwrap_or_else(|_| {
        warn!(task_id, status = value, "Unknown status column, using pending");
        TaskStatus::default()
    })
}

fn priority_from_column(task_id: i64, value: &str) -> TaskPriority {
    value.parse().unwrap_or_else(|_| {
        warn!(task_id, priority = value, "Unknown priority column, using medium");
        TaskPriority::default()
    })
}

impl From<task_entity::Model> for Task {
    fn from(model: task_entity::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            description: model.description,
            status: status_from_column(model.id, &model.status),
            priority: priority_from_column(model.id, &model.priority),
            labels: labels_from_json(model.id, model.labels),
            reminder_time: model.reminder_time,
            recurrence_rule: model
                .recurrence_rule
                .as_deref()
                .and_then(|rule| rule.parse().ok()),
            next_trigger: model.next_trigger,
            subtasks: Vec::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<subtask_entity::Model> for Subtask {
    fn from(model: subtask_entity::Model) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            title: model.title,
            is_done: model.is_done,
            created_at: model.created_at,
        }
    }
}

impl DueTask {
    /// 行上没有触发时间时返回 `None`
    fn from_model(model: task_entity::Model) -> Option<Self> {
        let next_trigger = model.next_trigger?;
        Some(Self {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            description: model.description,
            priority: priority_from_column(model.id, &model.priority),
            labels: labels_from_json(model.id, model.labels),
            recurrence_rule: model.recurrence_rule.unwrap_or_default(),
            next_trigger,
        })
    }
}

/// 构造任务的可写字段，ID 与所有者由调用方决定是否设置
fn writable_fields(task: &Task) -> task_entity::ActiveModel {
    task_entity::ActiveModel {
        title: Set(task.title.clone()),
        description: Set(task.description.clone()),
        status: Set(task.status.to_string()),
        priority: Set(task.priority.to_string()),
        labels: Set(labels_to_json(&task.labels)),
        reminder_time: Set(task.reminder_time.map(to_utc)),
        recurrence_rule: Set(task.recurrence_rule.map(|rule| rule.to_string())),
        next_trigger: Set(task.next_trigger.map(to_utc)),
        updated_at: Set(to_utc(task.updated_at)),
        ..Default::default()
    }
}

async fn insert_clone_on<C: ConnectionTrait>(conn: &C, clone: &TaskClone) -> Result<i64, DbErr> {
    let created_at = to_utc(clone.created_at);
    let model = task_entity::ActiveModel {
        owner_id: Set(clone.owner_id),
        title: Set(clone.title.clone()),
        description: Set(clone.description.clone()),
        status: Set(TaskStatus::Pending.to_string()),
        priority: Set(clone.priority.to_string()),
        labels: Set(labels_to_json(&clone.labels)),
        reminder_time: Set(None),
        recurrence_rule: Set(None),
        next_trigger: Set(None),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        ..Default::default()
    };

    let inserted = model.insert(conn).await?;
    Ok(inserted.id)
}

async fn advance_on<C: ConnectionTrait>(
    conn: &C,
    task_id: i64,
    next_trigger: DateTime<FixedOffset>,
) -> Result<u64, DbErr> {
    let result = task_entity::Entity::update_many()
        .col_expr(
            task_entity::Column::NextTrigger,
            Expr::value(Some(to_utc(next_trigger))),
        )
        .filter(task_entity::Column::Id.eq(task_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, task: &Task) -> Result<Task, RepositoryError> {
        let mut model = writable_fields(task);
        model.owner_id = Set(task.owner_id);
        model.created_at = Set(to_utc(task.created_at));

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, RepositoryError> {
        let models = task_entity::Entity::find()
            .filter(task_entity::Column::OwnerId.eq(owner_id))
            .order_by_desc(task_entity::Column::CreatedAt)
            .order_by_desc(task_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let task_ids: Vec<i64> = models.iter().map(|model| model.id).collect();
        let mut subtasks: HashMap<i64, Vec<Subtask>> = HashMap::new();
        for sub in subtask_entity::Entity::find()
            .filter(subtask_entity::Column::TaskId.is_in(task_ids))
            .order_by_asc(subtask_entity::Column::Id)
            .all(self.db.as_ref())
            .await?
        {
            subtasks.entry(sub.task_id).or_default().push(sub.into());
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let mut task: Task = model.into();
                task.subtasks = subtasks.remove(&task.id).unwrap_or_default();
                task
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update(&self, task: &Task) -> Result<Task, RepositoryError> {
        let mut model = writable_fields(task);
        model.id = Set(task.id);

        match model.update(self.db.as_ref()).await {
            Ok(updated) => {
                let mut updated: Task = updated.into();
                updated.subtasks = task.subtasks.clone();
                Ok(updated)
            }
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        subtask_entity::Entity::delete_many()
            .filter(subtask_entity::Column::TaskId.eq(id))
            .exec(&txn)
            .await?;
        let result = task_entity::Entity::delete_by_id(id).exec(&txn).await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn create_subtask(&self, task_id: i64, title: &str) -> Result<Subtask, RepositoryError> {
        let model = subtask_entity::ActiveModel {
            task_id: Set(task_id),
            title: Set(title.to_string()),
            is_done: Set(false),
            created_at: Set(utc_now()),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_subtask(&self, id: i64) -> Result<Option<Subtask>, RepositoryError> {
        let model = subtask_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn toggle_subtask(&self, id: i64) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let current = subtask_entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let is_done = current.is_done;
        let mut active: subtask_entity::ActiveModel = current.into();
        active.is_done = Set(!is_done);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn delete_subtask(&self, id: i64) -> Result<(), RepositoryError> {
        let result = subtask_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl RecurringTaskStore for TaskRepositoryImpl {
    async fn find_due_recurring(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<DueTask>, RepositoryError> {
        let models = task_entity::Entity::find()
            .filter(task_entity::Column::RecurrenceRule.is_not_null())
            .filter(task_entity::Column::RecurrenceRule.ne(""))
            .filter(task_entity::Column::RecurrenceRule.ne("none"))
            .filter(task_entity::Column::NextTrigger.lte(to_utc(now)))
            .order_by_asc(task_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().filter_map(DueTask::from_model).collect())
    }

    async fn insert_clone(&self, clone: &TaskClone) -> Result<i64, RepositoryError> {
        Ok(insert_clone_on(self.db.as_ref(), clone).await?)
    }

    async fn advance_next_trigger(
        &self,
        task_id: i64,
        next_trigger: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        match advance_on(self.db.as_ref(), task_id, next_trigger).await? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    async fn clone_and_advance(
        &self,
        clone: &TaskClone,
        task_id: i64,
        next_trigger: DateTime<FixedOffset>,
    ) -> Result<i64, RepositoryError> {
        let txn = self.db.begin().await?;

        let clone_id = insert_clone_on(&txn, clone).await?;
        if advance_on(&txn, task_id, next_trigger).await? == 0 {
            txn.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await?;
        Ok(clone_id)
    }
}

#[cfg(test)]
#[path = "task_repo_impl_test.rs"]
mod tests;
