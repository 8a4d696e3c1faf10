// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::domain::models::task::TaskPriority;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryTasks {
        tasks: Mutex<Vec<Task>>,
        subtasks: Mutex<Vec<Subtask>>,
        delay: Option<Duration>,
    }

    impl InMemoryTasks {
        async fn pause(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl TaskRepository for InMemoryTasks {
        async fn create(&self, task: &Task) -> Result<Task, RepositoryError> {
            self.pause().await;
            let mut tasks = self.tasks.lock().unwrap();
            let mut stored = task.clone();
            stored.id = tasks.len() as i64 + 1;
            tasks.push(stored.clone());
            Ok(stored)
        }

        async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, RepositoryError> {
            self.pause().await;
            let subtasks = self.subtasks.lock().unwrap();
            let mut owned: Vec<Task> = self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.owner_id == owner_id)
                .cloned()
                .map(|mut t| {
                    t.subtasks = subtasks.iter().filter(|s| s.task_id == t.id).cloned().collect();
                    t
                })
                .collect();
            owned.reverse();
            Ok(owned)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Task>, RepositoryError> {
            self.pause().await;
            Ok(self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }

        async fn update(&self, task: &Task) -> Result<Task, RepositoryError> {
            let mut tasks = self.tasks.lock().unwrap();
            let slot = tasks
                .iter_mut()
                .find(|t| t.id == task.id)
                .ok_or(RepositoryError::NotFound)?;
            *slot = task.clone();
            Ok(task.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            self.subtasks.lock().unwrap().retain(|s| s.task_id != id);
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }

        async fn create_subtask(
            &self,
            task_id: i64,
            title: &str,
        ) -> Result<Subtask, RepositoryError> {
            let mut subtasks = self.subtasks.lock().unwrap();
            let subtask = Subtask {
                id: subtasks.len() as i64 + 1,
                task_id,
                title: title.to_string(),
                is_done: false,
                created_at: crate::domain::models::task::utc_now(),
            };
            subtasks.push(subtask.clone());
            Ok(subtask)
        }

        async fn find_subtask(&self, id: i64) -> Result<Option<Subtask>, RepositoryError> {
            Ok(self
                .subtasks
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned())
        }

        async fn toggle_subtask(&self, id: i64) -> Result<(), RepositoryError> {
            let mut subtasks = self.subtasks.lock().unwrap();
            let subtask = subtasks
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(RepositoryError::NotFound)?;
            subtask.is_done = !subtask.is_done;
            Ok(())
        }

        async fn delete_subtask(&self, id: i64) -> Result<(), RepositoryError> {
            self.subtasks.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }
    }

    fn use_case() -> TaskUseCase<InMemoryTasks> {
        TaskUseCase::new(Arc::new(InMemoryTasks::default()), Duration::from_secs(2))
    }

    fn titled(title: &str) -> CreateTaskRequestDto {
        CreateTaskRequestDto {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let use_case = use_case();

        let task = use_case.create(1, titled("Write report")).await.unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.recurrence_rule, None);
        assert_eq!(task.next_trigger, None);
    }

    #[tokio::test]
    async fn test_create_recurring_without_trigger_starts_one_period_out() {
        let use_case = use_case();
        let dto = CreateTaskRequestDto {
            recurrence_rule: Some("weekly".to_string()),
            ..titled("Review")
        };

        let task = use_case.create(1, dto).await.unwrap();

        assert_eq!(task.recurrence_rule, Some(RecurrenceRule::Weekly));
        assert_eq!(
            task.next_trigger,
            Some(task.created_at + chrono::Days::new(7))
        );
    }

    #[tokio::test]
    async fn test_create_treats_none_as_one_shot_and_rejects_unknown_rule() {
        let use_case = use_case();

        let none = CreateTaskRequestDto {
            recurrence_rule: Some("none".to_string()),
            next_trigger: Some(crate::domain::models::task::utc_now()),
            ..titled("Once")
        };
        let task = use_case.create(1, none).await.unwrap();
        assert_eq!(task.recurrence_rule, None);
        assert_eq!(task.next_trigger, None);

        let unknown = CreateTaskRequestDto {
            recurrence_rule: Some("hourly".to_string()),
            ..titled("Bad")
        };
        let err = use_case.create(1, unknown).await.unwrap_err();
        assert!(matches!(err, TaskUseCaseError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let err = use_case().create(1, titled("")).await.unwrap_err();

        assert!(matches!(err, TaskUseCaseError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_status_checks_existence_and_owner() {
        let use_case = use_case();
        let task = use_case.create(1, titled("Mine")).await.unwrap();

        let missing = use_case
            .update_status(999, 1, TaskStatus::Done)
            .await
            .unwrap_err();
        assert!(matches!(missing, TaskUseCaseError::TaskNotFound));

        let foreign = use_case
            .update_status(task.id, 2, TaskStatus::Done)
            .await
            .unwrap_err();
        assert!(matches!(foreign, TaskUseCaseError::Forbidden));

        use_case
            .update_status(task.id, 1, TaskStatus::InProgress)
            .await
            .unwrap();
        let stored = use_case.fetch(1).await.unwrap();
        assert_eq!(stored[0].status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_owner() {
        let use_case = use_case();
        let task = use_case.create(1, titled("Keep")).await.unwrap();

        let err = use_case.delete(task.id, 2).await.unwrap_err();
        assert!(matches!(err, TaskUseCaseError::Forbidden));
        assert_eq!(use_case.fetch(1).await.unwrap().len(), 1);

        use_case.delete(task.id, 1).await.unwrap();
        assert!(use_case.fetch(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subtask_lifecycle_is_owner_scoped() {
        let use_case = use_case();
        let task = use_case.create(1, titled("Trip")).await.unwrap();

        let subtask = use_case
            .add_subtask(
                task.id,
                1,
                CreateSubtaskRequestDto {
                    title: "Pack bags".to_string(),
                },
            )
            .await
            .unwrap();

        let foreign = use_case.toggle_subtask(subtask.id, 2).await.unwrap_err();
        assert!(matches!(foreign, TaskUseCaseError::Forbidden));

        use_case.toggle_subtask(subtask.id, 1).await.unwrap();
        let fetched = use_case.fetch(1).await.unwrap();
        assert!(fetched[0].subtasks[0].is_done);

        use_case.delete_subtask(subtask.id, 1).await.unwrap();
        let missing = use_case.delete_subtask(subtask.id, 1).await.unwrap_err();
        assert!(matches!(missing, TaskUseCaseError::SubtaskNotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out() {
        let repo = InMemoryTasks {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let use_case = TaskUseCase::new(Arc::new(repo), Duration::from_secs(2));

        let err = use_case.fetch(1).await.unwrap_err();

        assert!(matches!(err, TaskUseCaseError::Timeout));
    }
}
