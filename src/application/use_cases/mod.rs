// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 编排领域对象与仓库完成具体业务操作
pub mod task_use_case;
pub mod user_use_case;
