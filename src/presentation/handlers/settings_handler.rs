// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::application::dto::update_global_settings_request::UpdateGlobalSettingsRequest;
use crate::domain::repositories::global_settings_repository::GlobalSettingsRepository;
use crate::domain::services::global_settings_service::GlobalSettingsService;
use crate::presentation::errors::AppError;

/// 获取当前全局设置
pub async fn get_settings<R>(
    Extension(service): Extension<Arc<GlobalSettingsService<R>>>,
) -> Result<impl IntoResponse, AppError>
where
    R: GlobalSettingsRepository + 'static,
{
    let settings = service.current().await?;
    Ok((StatusCode::OK, Json(settings)))
}

/// 更新全局设置
///
/// # 返回值
///
/// * `200` - 更新后的设置
/// * `400` - 请求字段超出允许范围
/// * `500` - 持久化失败
pub async fn update_settings<R>(
    Extension(service): Extension<Arc<GlobalSettingsService<R>>>,
    Json(payload): Json<UpdateGlobalSettingsRequest>,
) -> Result<impl IntoResponse, AppError>
where
    R: GlobalSettingsRepository + 'static,
{
    let settings = service.update(payload).await?;
    info!(
        "Global settings updated (maintenance_mode={})",
        settings.maintenance_mode
    );
    Ok((StatusCode::OK, Json(settings)))
}
