// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含应用程序的业务用例与数据传输对象，
/// 将业务逻辑与基础设施分离
pub mod dto;
pub mod use_cases;
