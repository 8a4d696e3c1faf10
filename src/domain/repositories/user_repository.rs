// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::User;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，邮箱重复时返回 `RepositoryError::Conflict`
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;
    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// 根据ID查找用户
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;
}
