// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::domain::repositories::settings_cache::SettingsCache;

/// 缓存统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub deletes: u64,
}

/// 缓存条目
struct CacheEntry {
    data: String,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// 进程内缓存
///
/// 未配置 Redis 时使用，仅在单实例部署中保证失效语义。
#[derive(Default)]
pub struct MemoryCache {
    cache: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }
}

#[async_trait]
impl SettingsCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match self.cache.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.data.clone()),
            _ => None,
        };

        match value {
            Some(data) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(data))
            }
            None => {
                self.cache.remove_if(key, |_, entry| entry.is_expired());
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.cache.insert(
            key.to_string(),
            CacheEntry {
                data: value.to_string(),
                created_at: Instant::now(),
                ttl,
            },
        );
        self.stores.fetch_add(1, Ordering::Relaxed);
        debug!("Stored memory cache entry for key: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.remove(key);
        self.deletes.fetch_add(1, Ordering::Relaxed);
        debug!("Deleted memory cache entry for key: {}", key);
        Ok(())
    }
}
