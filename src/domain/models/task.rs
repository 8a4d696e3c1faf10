// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 周期任务自动生成实例时追加在标题后的标记
pub const GENERATION_MARKER: &str = "(Auto)";

/// 当前时间，统一为 UTC 偏移
///
/// 数据库中的所有时间戳都以 UTC 偏移存储，以保证比较结果一致
pub fn utc_now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// 将任意偏移的时间戳规范化为 UTC 偏移
pub fn to_utc(value: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    value.with_timezone(&Utc).fixed_offset()
}

/// 任务实体
///
/// 用户的一条待办事项。设置了周期规则的任务会在 `next_trigger`
/// 到期时由后台工作器复制出新的待处理实例。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// 任务唯一标识符
    pub id: i64,
    /// 所属用户ID，创建后不可变
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    /// 任务状态
    pub status: TaskStatus,
    /// 任务优先级
    pub priority: TaskPriority,
    /// 标签，例如 ["work", "bug"]
    pub labels: Vec<String>,
    /// 提醒时间
    pub reminder_time: Option<DateTime<FixedOffset>>,
    /// 周期规则，为空表示一次性任务
    pub recurrence_rule: Option<RecurrenceRule>,
    /// 下一次触发时间
    pub next_trigger: Option<DateTime<FixedOffset>>,
    /// 子任务清单
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 子任务，任务下的检查项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    /// 所属任务ID
    pub task_id: i64,
    pub title: String,
    pub is_done: bool,
    pub created_at: DateTime<FixedOffset>,
}

/// 任务状态枚举
///
/// 状态可以被用户任意切换，新生成的周期实例总是 Pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 待处理
    #[default]
    Pending,
    /// 进行中
    InProgress,
    /// 已完成
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(DomainError::ValidationError(format!(
                "invalid status: {}",
                other
            ))),
        }
    }
}

/// 任务优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(DomainError::ValidationError(format!(
                "invalid priority: {}",
                other
            ))),
        }
    }
}

/// 周期规则
///
/// 存储为小写字符串。数据库中的空字符串或 NULL 表示任务不重复，
/// 不在此枚举中表示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceRule {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecurrenceRule::Daily => write!(f, "daily"),
            RecurrenceRule::Weekly => write!(f, "weekly"),
            RecurrenceRule::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurrenceRule::Daily),
            "weekly" => Ok(RecurrenceRule::Weekly),
            "monthly" => Ok(RecurrenceRule::Monthly),
            other => Err(DomainError::ValidationError(format!(
                "invalid recurrence rule: {}",
                other
            ))),
        }
    }
}

impl RecurrenceRule {
    /// 解析来自请求的可选周期规则
    ///
    /// `None`、空串与 `"none"` 均视为不重复
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, DomainError> {
        match value.map(str::trim) {
            None | Some("") | Some("none") => Ok(None),
            Some(rule) => rule.parse().map(Some),
        }
    }
}

/// 到期的周期任务
///
/// 任务仓库 `find_due_recurring` 的返回行，只包含调度器需要的字段。
/// `recurrence_rule` 保留数据库中的原始字符串，无法识别的规则
/// 仍会被复制，但不会被重新调度。
#[derive(Debug, Clone, PartialEq)]
pub struct DueTask {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub labels: Vec<String>,
    pub recurrence_rule: String,
    pub next_trigger: DateTime<FixedOffset>,
}

/// 从到期任务派生出的新实例
///
/// 实例是一次性的：不带周期规则、下一次触发时间和提醒时间
#[derive(Debug, Clone, PartialEq)]
pub struct TaskClone {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub labels: Vec<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl TaskClone {
    /// 根据到期任务构造新实例
    ///
    /// # 参数
    ///
    /// * `parent` - 到期的父任务
    /// * `now` - 本轮调度的当前时间，用作实例的创建与更新时间
    pub fn from_parent(parent: &DueTask, now: DateTime<FixedOffset>) -> Self {
        Self {
            owner_id: parent.owner_id,
            title: format!("{} {}", parent.title, GENERATION_MARKER),
            description: parent.description.clone(),
            priority: parent.priority,
            labels: parent.labels.clone(),
            created_at: now,
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Task {
    /// 创建一个新的待处理任务
    ///
    /// ID 由仓库在插入时分配，此处置为 0
    pub fn new(owner_id: i64, title: String) -> Self {
        let now = utc_now();
        Self {
            id: 0,
            owner_id,
            title,
            description: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            labels: Vec::new(),
            reminder_time: None,
            recurrence_rule: None,
            next_trigger: None,
            subtasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 是否到期
    ///
    /// 只有设置了周期规则且 `next_trigger <= now` 的任务才算到期
    pub fn is_due(&self, now: DateTime<FixedOffset>) -> bool {
        match (self.recurrence_rule, self.next_trigger) {
            (Some(_), Some(next)) => next <= now,
            _ => false,
        }
    }

    /// 修改任务状态并刷新更新时间
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = utc_now();
    }
}
