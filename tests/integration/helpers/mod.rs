// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use global_settings::config::settings::DatabaseSettings;
use global_settings::domain::repositories::settings_cache::SettingsCache;
use global_settings::domain::services::global_settings_service::GlobalSettingsService;
use global_settings::infrastructure::cache::memory_cache::MemoryCache;
use global_settings::infrastructure::database::connection;
use global_settings::infrastructure::repositories::global_settings_repo_impl::GlobalSettingsRepositoryImpl;
use global_settings::presentation::middleware::auth_middleware::AdminAuthState;
use global_settings::presentation::routes;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const ADMIN_TOKEN: &str = "test-admin-token";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub db_pool: Arc<DatabaseConnection>,
    pub cache: Arc<MemoryCache>,
}

pub async fn create_test_app() -> TestApp {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: None,
        min_connections: None,
        connect_timeout: Some(5),
        idle_timeout: None,
        log_statements: false,
    };

    let db = Arc::new(connection::create_pool(&settings).await.unwrap());
    Migrator::up(db.as_ref(), None).await.unwrap();

    let cache = Arc::new(MemoryCache::new());
    let shared: Arc<dyn SettingsCache> = cache.clone();
    let repo = Arc::new(GlobalSettingsRepositoryImpl::new(
        db.clone(),
        Some(shared.clone()),
    ));
    let service = Arc::new(GlobalSettingsService::new(
        repo,
        Some(shared),
        Duration::from_secs(60),
    ));

    let router = routes::routes(
        service,
        AdminAuthState::new(Some(ADMIN_TOKEN.to_string())),
    );

    TestApp {
        router,
        db_pool: db,
        cache,
    }
}

/// 发送请求并返回状态码与 JSON 响应体
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
