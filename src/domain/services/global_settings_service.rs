// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::application::dto::update_global_settings_request::UpdateGlobalSettingsRequest;
use crate::domain::models::global_settings::{GlobalSettings, GLOBAL_SETTINGS_CACHE_KEY};
use crate::domain::repositories::global_settings_repository::{
    GlobalSettingsRepository, RepositoryError,
};
use crate::domain::repositories::settings_cache::SettingsCache;

/// 全局设置服务错误
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 请求未通过校验
    #[error("invalid settings: {0}")]
    Validation(#[from] ValidationErrors),
    /// 仓库操作失败
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 全局设置服务
///
/// 在仓库之上提供读穿缓存：读取时优先命中缓存，未命中再查询仓库并回填。
/// 更新经过校验后交给仓库，由仓库删除缓存键，随后服务把新值写回缓存。
///
/// 回填与更新由 `fill_lock` 互斥：回填持有读锁，更新持有写锁，
/// 因此在更新之前读到的旧值不会在更新之后写进缓存。
pub struct GlobalSettingsService<R: GlobalSettingsRepository> {
    repo: Arc<R>,
    cache: Option<Arc<dyn SettingsCache>>,
    cache_ttl: Duration,
    fill_lock: RwLock<()>,
}

impl<R: GlobalSettingsRepository> GlobalSettingsService<R> {
    /// 创建新的全局设置服务
    ///
    /// # 参数
    ///
    /// * `repo` - 全局设置仓库
    /// * `cache` - 可选缓存，为 `None` 时每次读取都直接访问仓库
    /// * `cache_ttl` - 缓存条目过期时间
    pub fn new(repo: Arc<R>, cache: Option<Arc<dyn SettingsCache>>, cache_ttl: Duration) -> Self {
        Self {
            repo,
            cache,
            cache_ttl,
            fill_lock: RwLock::new(()),
        }
    }

    /// 获取当前全局设置
    pub async fn current(&self) -> Result<GlobalSettings, ServiceError> {
        if let Some(cached) = self.read_cache().await {
            return Ok(cached);
        }

        let _fill = self.fill_lock.read().await;
        let settings = self.repo.get_global_settings().await?;
        self.fill_cache(&settings).await;
        Ok(settings)
    }

    /// 校验并更新全局设置
    ///
    /// # 返回值
    ///
    /// * `Ok(GlobalSettings)` - 更新后的设置
    /// * `Err(ServiceError::Validation)` - 请求字段超出允许范围
    /// * `Err(ServiceError::Repository)` - 持久化失败
    pub async fn update(
        &self,
        request: UpdateGlobalSettingsRequest,
    ) -> Result<GlobalSettings, ServiceError> {
        request.validate()?;

        let _fill = self.fill_lock.write().await;
        let updated = self
            .repo
            .update_global_settings(GlobalSettings::from(request))
            .await?;
        self.fill_cache(&updated).await;
        debug!(
            "Global settings updated at {} (maintenance_mode={})",
            updated.updated_at, updated.maintenance_mode
        );
        Ok(updated)
    }

    /// 系统当前是否处于维护模式
    pub async fn is_maintenance_mode(&self) -> Result<bool, ServiceError> {
        Ok(self.current().await?.maintenance_mode)
    }

    async fn read_cache(&self) -> Option<GlobalSettings> {
        let cache = self.cache.as_ref()?;

        match cache.get(GLOBAL_SETTINGS_CACHE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    warn!("Discarding undecodable cached global settings: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read global settings from cache: {}", e);
                None
            }
        }
    }

    async fn fill_cache(&self, settings: &GlobalSettings) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };

        let raw = match serde_json::to_string(settings) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize global settings for cache: {}", e);
                return;
            }
        };

        if let Err(e) = cache
            .set(GLOBAL_SETTINGS_CACHE_KEY, &raw, self.cache_ttl)
            .await
        {
            warn!("Failed to write global settings to cache: {}", e);
        }
    }
}
