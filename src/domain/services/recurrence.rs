// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::RecurrenceRule;
use chrono::{DateTime, Days, FixedOffset, Months};

/// 按周期规则推进触发时间
///
/// * `Daily` - 加 1 个日历日
/// * `Weekly` - 加 7 个日历日
/// * `Monthly` - 加 1 个日历月，保持日期与时刻不变；目标月份没有该日期时
///   取目标月份的最后一天（1 月 31 日 -> 2 月 28/29 日）
///
/// 时区偏移保持不变
pub fn advance(current: DateTime<FixedOffset>, rule: RecurrenceRule) -> DateTime<FixedOffset> {
    match rule {
        RecurrenceRule::Daily => current + Days::new(1),
        RecurrenceRule::Weekly => current + Days::new(7),
        RecurrenceRule::Monthly => current + Months::new(1),
    }
}

/// 计算下一次触发时间
///
/// 规则为空或无法识别时返回 `None`，调用方此时不得写回触发时间
///
/// # 参数
///
/// * `current` - 任务当前的 `next_trigger`（不是当前时间）
/// * `rule` - 数据库中保存的原始规则字符串
pub fn next_trigger(current: DateTime<FixedOffset>, rule: &str) -> Option<DateTime<FixedOffset>> {
    rule.parse::<RecurrenceRule>()
        .ok()
        .map(|rule| advance(current, rule))
}
