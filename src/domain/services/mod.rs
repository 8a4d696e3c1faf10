// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 周期计算（recurrence）：根据周期规则推导下一次触发时间的纯函数
pub mod recurrence;
