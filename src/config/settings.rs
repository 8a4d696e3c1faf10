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

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、数据库、认证、用例超时、周期任务调度器和指标导出等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 认证配置
    pub auth: AuthSettings,
    /// 用例层配置
    pub use_case: UseCaseSettings,
    /// 周期任务调度器配置
    pub scheduler: SchedulerSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 是否记录SQL语句
    #[serde(default)]
    pub log_statements: bool,
}

/// 认证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// JWT签名密钥
    pub jwt_secret: String,
    /// 访问令牌有效期（小时）
    pub token_ttl_hours: i64,
    /// 密码哈希迭代次数
    pub password_iterations: u32,
}

/// 用例层配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct UseCaseSettings {
    /// 单次用例操作的超时时间（毫秒）
    pub timeout_ms: u64,
}

/// 周期任务调度器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// 是否启动调度器
    pub enabled: bool,
    /// 调度周期（秒）
    pub interval_seconds: u64,
    /// 单次存储调用的超时时间（毫秒）
    pub call_timeout_ms: u64,
    /// 同一轮内并发处理的到期任务数上限
    pub max_concurrency: usize,
    /// 是否在同一事务中完成复制与重新调度
    pub atomic_regeneration: bool,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub address: String,
}

impl UseCaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SchedulerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Settings {
    /// 带有全部默认值的配置构建器
    ///
    /// `database.url` 与 `auth.jwt_secret` 没有默认值，必须由配置文件或环境变量提供
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.log_statements", false)?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("auth.password_iterations", 100_000)?
            .set_default("use_case.timeout_ms", 2000)?
            // Default scheduler settings
            .set_default("scheduler.enabled", true)?
            .set_default("scheduler.interval_seconds", 60)?
            .set_default("scheduler.call_timeout_ms", 2000)?
            .set_default("scheduler.max_concurrency", 4)?
            .set_default("scheduler.atomic_regeneration", false)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.address", "0.0.0.0:9000")
    }

    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `TASKMGR__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TASKMGR").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
