// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP处理器模块
///
/// 将HTTP请求转换为用例调用
pub mod auth_handler;
pub mod task_handler;
