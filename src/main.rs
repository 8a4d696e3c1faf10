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

use std::sync::Arc;
use taskmgr::application::use_cases::task_use_case::TaskUseCase;
use taskmgr::application::use_cases::user_use_case::UserUseCase;
use taskmgr::config::settings::Settings;
use taskmgr::infrastructure::database::connection;
use taskmgr::infrastructure::metrics::init_metrics;
use taskmgr::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use taskmgr::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use taskmgr::presentation::routes;
use taskmgr::utils::password::PasswordHasher;
use taskmgr::utils::telemetry;
use taskmgr::utils::token::TokenService;
use taskmgr::workers::{RecurringTaskWorker, RecurringTaskWorkerOptions};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting taskmgr...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Repositories and use cases
    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let tokens = Arc::new(TokenService::new(
        settings.auth.jwt_secret.clone(),
        settings.auth.token_ttl_hours,
    ));

    let user_use_case = Arc::new(UserUseCase::new(
        user_repo,
        PasswordHasher::new(settings.auth.password_iterations),
        tokens.as_ref().clone(),
        settings.use_case.timeout(),
    ));
    let task_use_case = Arc::new(TaskUseCase::new(
        task_repo.clone(),
        settings.use_case.timeout(),
    ));

    // 5. Start the recurring task worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = if settings.scheduler.enabled {
        let options = RecurringTaskWorkerOptions::from(&settings.scheduler);
        Some(RecurringTaskWorker::new(task_repo, options).start(shutdown_rx))
    } else {
        info!("Recurring task worker disabled");
        None
    };

    // 6. Start HTTP server
    let app = routes::routes(user_use_case, task_use_case, tokens);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, waiting for recurring task worker");
    let _ = shutdown_tx.send(true);
    if let Some(handle) = worker_handle {
        if let Err(e) = handle.await {
            warn!("Recurring task worker ended abnormally: {}", e);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
