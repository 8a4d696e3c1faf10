// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 任务仓库（task_repository）：任务与子任务的持久化，以及周期任务存储契约
/// - 用户仓库（user_repository）：用户的注册与查询
pub mod task_repository;
pub mod user_repository;
