// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::task::{TaskPriority, TaskStatus};

/// 创建任务请求
///
/// `recurrence_rule` 为空或 `"none"` 时任务不重复；`next_trigger`
/// 省略时由用例根据规则推算首次触发时间
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct CreateTaskRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub reminder_time: Option<DateTime<FixedOffset>>,
    pub recurrence_rule: Option<String>,
    pub next_trigger: Option<DateTime<FixedOffset>>,
}

/// 更新任务状态请求
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStatusRequestDto {
    pub status: TaskStatus,
}

/// 创建子任务请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateSubtaskRequestDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}

/// 通用消息响应
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageResponseDto {
    pub message: String,
}

impl MessageResponseDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
