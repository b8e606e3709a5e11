// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::global_settings_repository::GlobalSettingsRepository;
use crate::domain::services::global_settings_service::GlobalSettingsService;
use crate::presentation::handlers::settings_handler;
use crate::presentation::middleware::auth_middleware::{admin_auth_middleware, AdminAuthState};
use axum::{middleware, routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `service` - 全局设置服务
/// * `auth` - 管理接口认证状态
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R>(service: Arc<GlobalSettingsService<R>>, auth: AdminAuthState) -> Router
where
    R: GlobalSettingsRepository + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let admin_routes = Router::new()
        .route(
            "/v1/admin/settings",
            get(settings_handler::get_settings::<R>).put(settings_handler::update_settings::<R>),
        )
        .layer(middleware::from_fn_with_state(auth, admin_auth_middleware))
        .layer(Extension(service));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
