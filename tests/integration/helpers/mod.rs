// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use taskmgr::application::use_cases::task_use_case::TaskUseCase;
use taskmgr::application::use_cases::user_use_case::UserUseCase;
use taskmgr::config::settings::DatabaseSettings;
use taskmgr::infrastructure::database::connection;
use taskmgr::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use taskmgr::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use taskmgr::presentation::routes;
use taskmgr::utils::password::PasswordHasher;
use taskmgr::utils::token::TokenService;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db_pool: Arc<DatabaseConnection>,
    pub task_repo: Arc<TaskRepositoryImpl>,
    pub tokens: Arc<TokenService>,
}

pub async fn create_test_app() -> TestApp {
    // A single connection keeps every query on the same in-memory database
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
        log_statements: false,
    };
    let db = Arc::new(connection::create_pool(&settings).await.unwrap());
    Migrator::up(db.as_ref(), None).await.unwrap();

    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let tokens = Arc::new(TokenService::new("integration-secret", 24));

    let user_use_case = Arc::new(UserUseCase::new(
        user_repo,
        PasswordHasher::new(1000),
        tokens.as_ref().clone(),
        Duration::from_secs(2),
    ));
    let task_use_case = Arc::new(TaskUseCase::new(task_repo.clone(), Duration::from_secs(2)));

    let app = routes::routes(user_use_case, task_use_case, tokens.clone());
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        db_pool: db,
        task_repo,
        tokens,
    }
}

/// 注册并登录，返回 (用户ID, 访问令牌)
pub async fn register_and_login(app: &TestApp, email: &str) -> (i64, String) {
    let register = app
        .server
        .post("/register")
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "correct-horse"
        }))
        .await;
    assert_eq!(register.status_code(), StatusCode::CREATED);
    let user_id = register.json::<serde_json::Value>()["user_id"]
        .as_i64()
        .unwrap();

    let login = app
        .server
        .post("/login")
        .json(&json!({ "email": email, "password": "correct-horse" }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
    let token = login.json::<serde_json::Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    (user_id, token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
