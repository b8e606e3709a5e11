// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;

use crate::domain::repositories::settings_cache::SettingsCache;

/// Redis客户端
///
/// 提供对Redis数据库的异步操作接口，每条命令（含建立连接）都受超时约束，
/// Redis 不可用时调用方会很快得到错误而不是一直阻塞。
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
    /// 单条命令超时时间
    command_timeout: Duration,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    /// * `command_timeout` - 单条命令超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisClient)` - Redis客户端实例
    /// * `Err(anyhow::Error)` - URL 无法解析
    pub fn new(redis_url: &str, command_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            command_timeout,
        })
    }

    async fn bounded<T, F>(&self, command: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(anyhow!(
                "redis command timed out after {:?}",
                self.command_timeout
            )),
        }
    }
}

#[async_trait]
impl SettingsCache for RedisClient {
    /// 获取指定键的值
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.bounded(async {
            let mut con = self.client.get_multiplexed_async_connection().await?;
            let value: Option<String> = con.get(key).await?;
            Ok::<_, redis::RedisError>(value)
        })
        .await
    }

    /// 设置键值对并指定过期时间
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.bounded(async {
            let mut con = self.client.get_multiplexed_async_connection().await?;
            con.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                .await?;
            Ok::<_, redis::RedisError>(())
        })
        .await
    }

    /// 删除键
    async fn delete(&self, key: &str) -> Result<()> {
        self.bounded(async {
            let mut con = self.client.get_multiplexed_async_connection().await?;
            let _removed: i64 = con.del(key).await?;
            Ok::<_, redis::RedisError>(())
        })
        .await
    }
}
