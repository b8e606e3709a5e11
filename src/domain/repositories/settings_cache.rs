// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 设置缓存特质
///
/// 全局设置所用的键值缓存接口。缓存只是性能优化，调用方
/// 必须能够容忍任意一次调用失败。
#[async_trait]
pub trait SettingsCache: Send + Sync {
    /// 读取键对应的值，不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入键值对并设置过期时间
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// 删除键
    async fn delete(&self, key: &str) -> Result<()>;
}
