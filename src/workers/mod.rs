// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台周期任务的调度与再生成
pub mod recurring_task_worker;

pub use recurring_task_worker::{CycleReport, RecurringTaskWorker, RecurringTaskWorkerOptions};
