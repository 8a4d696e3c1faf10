// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 任务（task）：用户的待办事项、子任务以及周期任务相关的值对象
/// - 用户（user）：任务的所有者
pub mod task;
pub mod user;
