// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 端到端测试模块
///
/// 模拟真实用户场景：注册、登录、维护任务，并由周期任务工作器生成新实例
pub mod user_journey_test;
