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

use global_settings::config::settings::Settings;
use global_settings::domain::repositories::settings_cache::SettingsCache;
use global_settings::domain::services::global_settings_service::GlobalSettingsService;
use global_settings::infrastructure::cache::memory_cache::MemoryCache;
use global_settings::infrastructure::cache::redis_client::RedisClient;
use global_settings::infrastructure::database::connection;
use global_settings::infrastructure::metrics;
use global_settings::infrastructure::repositories::global_settings_repo_impl::GlobalSettingsRepositoryImpl;
use global_settings::presentation::middleware::auth_middleware::AdminAuthState;
use global_settings::presentation::routes;
use global_settings::utils::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};

/// 根据配置选择缓存实现
///
/// 配置了 Redis 时使用 Redis，否则退回进程内缓存
fn build_cache(settings: &Settings) -> anyhow::Result<Option<Arc<dyn SettingsCache>>> {
    if !settings.cache.enabled {
        info!("Settings cache disabled");
        return Ok(None);
    }

    match &settings.redis {
        Some(redis) => {
            let client = RedisClient::new(
                &redis.url,
                Duration::from_millis(redis.command_timeout_ms),
            )?;
            info!("Redis settings cache initialized");
            Ok(Some(Arc::new(client)))
        }
        None => {
            warn!("No redis configured, using in-process settings cache");
            Ok(Some(Arc::new(MemoryCache::new())))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting global-settings...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    metrics::init_metrics(&settings.metrics)?;

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Wire repository and service
    let cache = build_cache(&settings)?;
    let repo = Arc::new(GlobalSettingsRepositoryImpl::new(db.clone(), cache.clone()));
    let service = Arc::new(GlobalSettingsService::new(
        repo,
        cache,
        Duration::from_secs(settings.cache.ttl_seconds),
    ));

    if settings.server.admin_token.is_none() {
        warn!("No admin token configured, admin routes are unauthenticated");
    }
    let auth = AdminAuthState::new(settings.server.admin_token.clone());

    // 5. Start HTTP server
    let app = routes::routes(service, auth);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
