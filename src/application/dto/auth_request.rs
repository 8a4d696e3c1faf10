// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 注册请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl RegisterRequestDto {
    /// 去除三个字段首尾空白
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

/// 登录请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequestDto {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginRequestDto {
    pub fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }
}

/// 注册成功响应
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterResponseDto {
    pub message: String,
    pub user_id: i64,
}

/// 登录成功响应
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponseDto {
    pub access_token: String,
    pub user: User,
}
