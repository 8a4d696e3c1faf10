// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::models::task::utc_now;

/// 用户实体
///
/// 密码只以哈希形式保存，序列化时不会输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一标识符
    pub id: i64,
    pub name: String,
    /// 登录邮箱，全局唯一
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl User {
    /// 创建一个尚未持久化的用户
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = utc_now();
        Self {
            id: 0,
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
