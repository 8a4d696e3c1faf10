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

use crate::config::settings::SchedulerSettings;
use crate::domain::models::task::{utc_now, DueTask, TaskClone};
use crate::domain::repositories::task_repository::{RecurringTaskStore, RepositoryError};
use crate::domain::services::recurrence;
use chrono::{DateTime, FixedOffset};
use futures::StreamExt;
use metrics::{counter, histogram};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// 周期任务工作器选项
#[derive(Debug, Clone)]
pub struct RecurringTaskWorkerOptions {
    /// 调度周期
    pub interval: Duration,
    /// 单次存储调用的超时时间
    pub call_timeout: Duration,
    /// 同一轮内并发处理的到期任务数上限
    pub max_concurrency: usize,
    /// 是否在同一事务中复制并重新调度
    pub atomic: bool,
}

impl Default for RecurringTaskWorkerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            call_timeout: Duration::from_secs(2),
            max_concurrency: 4,
            atomic: false,
        }
    }
}

impl From<&SchedulerSettings> for RecurringTaskWorkerOptions {
    fn from(settings: &SchedulerSettings) -> Self {
        Self {
            interval: settings.interval(),
            call_timeout: settings.call_timeout(),
            max_concurrency: settings.max_concurrency.max(1),
            atomic: settings.atomic_regeneration,
        }
    }
}

/// 一轮调度的结果
///
/// `failures` 统计失败的步骤数（复制或重新调度），同一任务的两个步骤分别计数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub due: usize,
    pub cloned: usize,
    pub rescheduled: usize,
    pub failures: usize,
    /// 上一轮仍在运行，本轮被跳过
    pub skipped: bool,
}

#[derive(Debug, Default)]
struct TaskOutcome {
    cloned: bool,
    rescheduled: bool,
    failures: usize,
}

/// 单轮互斥守卫，离开作用域时释放运行标记
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 周期任务工作器
///
/// 按固定周期扫描到期的周期任务：为每个到期任务插入一个待处理实例，
/// 并把父任务的 `next_trigger` 推进一个周期。单个任务失败只记录日志，
/// 不影响同一轮中的其他任务，也不会中止调度循环。
pub struct RecurringTaskWorker<S>
where
    S: RecurringTaskStore + 'static,
{
    store: Arc<S>,
    options: RecurringTaskWorkerOptions,
    running: AtomicBool,
}

impl<S> RecurringTaskWorker<S>
where
    S: RecurringTaskStore + 'static,
{
    /// 创建新的周期任务工作器
    ///
    /// # 参数
    ///
    /// * `store` - 周期任务存储
    /// * `options` - 调度选项
    pub fn new(store: Arc<S>, options: RecurringTaskWorkerOptions) -> Self {
        Self {
            store,
            options,
            running: AtomicBool::new(false),
        }
    }

    /// 运行调度循环，直到 `shutdown` 变为 `true` 或发送端被丢弃
    ///
    /// 关闭信号只在两轮之间生效，正在执行的一轮总会完整结束
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.options.interval.as_secs(),
            atomic = self.options.atomic,
            "Recurring task worker started"
        );

        let mut interval = tokio::time::interval(self.options.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.run_cycle().await;
                    if report.due > 0 {
                        info!(
                            due = report.due,
                            cloned = report.cloned,
                            rescheduled = report.rescheduled,
                            failures = report.failures,
                            "Recurring task cycle finished"
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Recurring task worker stopped");
    }

    /// 启动后台运行
    pub fn start(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(shutdown).await;
        })
    }

    /// 以当前时间执行一轮调度
    pub async fn run_cycle(&self) -> CycleReport {
        self.run_cycle_at(utc_now()).await
    }

    /// 以指定时间执行一轮调度
    ///
    /// 上一轮尚未结束时立即返回 `skipped = true` 的报告
    pub async fn run_cycle_at(&self, now: DateTime<FixedOffset>) -> CycleReport {
        let Some(_guard) = self.try_begin() else {
            warn!("Previous recurring task cycle still running, skipping this one");
            counter!("recurring_task_cycles_skipped_total").increment(1);
            return CycleReport {
                skipped: true,
                ..Default::default()
            };
        };

        counter!("recurring_task_cycles_total").increment(1);
        let start = Instant::now();

        let due = match self.call(self.store.find_due_recurring(now)).await {
            Ok(due) => due,
            Err(e) => {
                error!("Failed to query due recurring tasks: {}", e);
                counter!("recurring_task_cycle_errors_total").increment(1);
                histogram!("recurring_task_cycle_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                return CycleReport::default();
            }
        };

        let mut report = CycleReport {
            due: due.len(),
            ..Default::default()
        };

        if due.is_empty() {
            debug!("No recurring tasks due");
        } else {
            info!(count = due.len(), "Processing due recurring tasks");

            let outcomes: Vec<TaskOutcome> = futures::stream::iter(due)
                .map(|task| self.process(task, now))
                .buffer_unordered(self.options.max_concurrency.max(1))
                .collect()
                .await;

            for outcome in outcomes {
                report.cloned += usize::from(outcome.cloned);
                report.rescheduled += usize::from(outcome.rescheduled);
                report.failures += outcome.failures;
            }
        }

        histogram!("recurring_task_cycle_duration_seconds").record(start.elapsed().as_secs_f64());
        report
    }

    fn try_begin(&self) -> Option<CycleGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CycleGuard(&self.running))
    }

    async fn call<T, F>(&self, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        tokio::time::timeout(self.options.call_timeout, fut)
            .await
            .unwrap_or(Err(RepositoryError::Timeout))
    }

    async fn process(&self, task: DueTask, now: DateTime<FixedOffset>) -> TaskOutcome {
        let clone = TaskClone::from_parent(&task, now);
        // Computed from the parent's trigger so a late cycle does not shift the schedule
        let next = recurrence::next_trigger(task.next_trigger, &task.recurrence_rule);

        if self.options.atomic {
            if let Some(next) = next {
                return self.clone_and_advance(&task, &clone, next).await;
            }
        }

        let mut outcome = TaskOutcome::default();

        match self.call(self.store.insert_clone(&clone)).await {
            Ok(clone_id) => {
                outcome.cloned = true;
                counter!("recurring_task_clones_total").increment(1);
                info!(task_id = task.id, clone_id, "Generated recurring task instance");
            }
            Err(e) => {
                outcome.failures += 1;
                counter!("recurring_task_failures_total", "step" => "clone").increment(1);
                error!(task_id = task.id, "Failed to clone recurring task: {}", e);
            }
        }

        let Some(next) = next else {
            warn!(
                task_id = task.id,
                rule = %task.recurrence_rule,
                "Unrecognized recurrence rule, next trigger left unchanged"
            );
            return outcome;
        };

        match self.call(self.store.advance_next_trigger(task.id, next)).await {
            Ok(()) => {
                outcome.rescheduled = true;
                counter!("recurring_task_reschedules_total").increment(1);
                debug!(task_id = task.id, next_trigger = %next, "Rescheduled recurring task");
            }
            Err(RepositoryError::NotFound) => {
                outcome.failures += 1;
                counter!("recurring_task_failures_total", "step" => "reschedule").increment(1);
                warn!(task_id = task.id, "Recurring task disappeared before reschedule");
            }
            Err(e) => {
                outcome.failures += 1;
                counter!("recurring_task_failures_total", "step" => "reschedule").increment(1);
                error!(task_id = task.id, "Failed to reschedule recurring task: {}", e);
            }
        }

        outcome
    }

    async fn clone_and_advance(
        &self,
        task: &DueTask,
        clone: &TaskClone,
        next: DateTime<FixedOffset>,
    ) -> TaskOutcome {
        match self
            .call(self.store.clone_and_advance(clone, task.id, next))
            .await
        {
            Ok(clone_id) => {
                counter!("recurring_task_clones_total").increment(1);
                counter!("recurring_task_reschedules_total").increment(1);
                info!(
                    task_id = task.id,
                    clone_id,
                    next_trigger = %next,
                    "Generated recurring task instance"
                );
                TaskOutcome {
                    cloned: true,
                    rescheduled: true,
                    failures: 0,
                }
            }
            Err(e) => {
                counter!("recurring_task_failures_total", "step" => "atomic").increment(1);
                error!(task_id = task.id, "Failed to regenerate recurring task: {}", e);
                TaskOutcome {
                    failures: 1,
                    ..Default::default()
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "recurring_task_worker_test.rs"]
mod tests;
