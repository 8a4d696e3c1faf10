// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{
    application::dto::auth_request::{LoginRequestDto, LoginResponseDto, RegisterRequestDto},
    domain::{
        models::user::User,
        repositories::{task_repository::RepositoryError, user_repository::UserRepository},
    },
    utils::{
        password::{PasswordError, PasswordHasher},
        token::{TokenError, TokenService},
    },
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    #[error("Password worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("Request timed out")]
    Timeout,
}

/// 用户注册与登录用例
pub struct UserUseCase<R> {
    user_repo: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenService,
    timeout: Duration,
}

impl<R> UserUseCase<R>
where
    R: UserRepository + 'static,
{
    pub fn new(
        user_repo: Arc<R>,
        hasher: PasswordHasher,
        tokens: TokenService,
        timeout: Duration,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
            timeout,
        }
    }

    async fn within<T, F>(&self, fut: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| AuthError::Timeout)?
    }

    // PBKDF2 is CPU bound; keep it off the async workers
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        Ok(tokio::task::spawn_blocking(move || hasher.hash(&password)).await??)
    }

    async fn verify_password(
        &self,
        password: String,
        encoded: String,
    ) -> Result<Result<bool, PasswordError>, AuthError> {
        let hasher = self.hasher.clone();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded)).await?)
    }

    /// 注册新用户，返回用户ID
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<i64, AuthError> {
        let dto = dto.trimmed();
        dto.validate()
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;

        if self
            .within(async { Ok(self.user_repo.find_by_email(&dto.email).await?) })
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.within(self.hash_password(dto.password.clone())).await?;
        let user = User::new(dto.name, dto.email, password_hash);

        let created = self
            .within(async {
                match self.user_repo.create(&user).await {
                    Ok(created) => Ok(created),
                    // Lost a race against a concurrent registration
                    Err(RepositoryError::Conflict) => Err(AuthError::EmailTaken),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        info!(user_id = created.id, "User registered");
        Ok(created.id)
    }

    /// 校验凭据并签发访问令牌
    ///
    /// 邮箱不存在与密码错误返回同一个错误
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto, AuthError> {
        let dto = dto.trimmed();
        dto.validate()
            .map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .within(async { Ok(self.user_repo.find_by_email(&dto.email).await?) })
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = self
            .within(self.verify_password(dto.password.clone(), user.password_hash.clone()))
            .await?;

        match verified {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::InvalidCredentials),
            Err(e) => {
                warn!(user_id = user.id, "Stored password hash unusable: {}", e);
                return Err(AuthError::InvalidCredentials);
            }
        }

        let access_token = self.tokens.issue(user.id)?;
        Ok(LoginResponseDto { access_token, user })
    }
}

#[cfg(test)]
#[path = "user_use_case_test.rs"]
mod tests;
