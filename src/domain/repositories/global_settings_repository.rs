// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::global_settings::GlobalSettings;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 存储层错误
///
/// 数据库返回的错误，或由绑定的上下文中止的操作
#[derive(Error, Debug)]
pub enum StoreError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 上下文已取消
    #[error("operation cancelled")]
    Cancelled,
    /// 超过上下文截止时间
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// 仓库错误类型
///
/// 每个变体标明失败的操作。"未找到" 永远不会出现在这里，
/// 读取时缺失的记录会被转换为创建默认设置。
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 读取当前设置失败
    #[error("failed to get global settings: {0}")]
    Fetch(#[source] StoreError),
    /// 更新前读取当前设置失败
    #[error("failed to get current settings: {0}")]
    FetchCurrent(#[source] Box<RepositoryError>),
    /// 执行更新语句失败
    #[error("failed to update global settings: {0}")]
    Update(#[source] StoreError),
    /// 创建默认设置失败
    #[error("failed to create default global settings: {0}")]
    CreateDefault(#[source] StoreError),
}

/// 全局设置仓库特质
///
/// 定义全局设置的数据访问接口。实现方负责把调用绑定到
/// 连接池或调用方提供的事务上，本身不开启、提交或回滚事务。
#[async_trait]
pub trait GlobalSettingsRepository: Send + Sync {
    /// 获取当前全局设置
    ///
    /// 读取创建时间最新的一行；表为空时创建并返回默认设置。
    ///
    /// # 返回值
    ///
    /// * `Ok(GlobalSettings)` - 当前生效的设置
    /// * `Err(RepositoryError)` - 读取或创建失败
    async fn get_global_settings(&self) -> Result<GlobalSettings, RepositoryError>;

    /// 更新全局设置
    ///
    /// 输入中的 `id` 与 `created_at` 会被忽略，返回值携带现有记录的
    /// 标识符、创建时间以及数据库生成的新更新时间。
    ///
    /// # 参数
    ///
    /// * `settings` - 包含全部策略字段的设置
    ///
    /// # 返回值
    ///
    /// * `Ok(GlobalSettings)` - 更新后的设置
    /// * `Err(RepositoryError)` - 读取当前设置或更新失败
    async fn update_global_settings(
        &self,
        settings: GlobalSettings,
    ) -> Result<GlobalSettings, RepositoryError>;

    /// 确保默认设置存在
    ///
    /// 以固定默认值插入，标识符冲突时返回已存在的记录。
    async fn create_default_global_settings(&self) -> Result<GlobalSettings, RepositoryError>;
}
